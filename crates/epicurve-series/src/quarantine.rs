//! Lockdown dates and their position on a plotted series.

use crate::model::{CountrySeries, DailyRecord, SeriesMap};
use chrono::NaiveDate;
use epicurve_common::{parse_iso_date, Result, ISO_DATE_FORMAT};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const BUILTIN_DATES: [(&str, &str); 32] = [
    ("United Kingdom", "2020-03-23"),
    ("Hungary", "2020-03-28"),
    ("Singapore", "2020-04-07"),
    ("United Arab Emirates", "2020-03-26"),
    ("Russia", "2020-03-20"),
    ("South Africa", "2020-03-26"),
    ("New Zealand", "2020-03-25"),
    ("Saudi Arabia", "2020-03-25"),
    ("Colombia", "2020-03-24"),
    ("India", "2020-03-24"),
    ("Australia", "2020-03-31"),
    ("China", "2020-01-23"),
    ("Jordan", "2020-03-21"),
    ("Argentina", "2020-03-21"),
    ("Israel", "2020-03-25"),
    ("Belgium", "2020-03-17"),
    ("Germany", "2020-03-20"),
    ("Malaysia", "2020-03-16"),
    ("Czech Republic", "2020-03-16"),
    ("France", "2020-03-16"),
    ("Morocco", "2020-03-15"),
    ("Kenya", "2020-03-15"),
    ("Spain", "2020-03-14"),
    ("Poland", "2020-03-13"),
    ("Kuwait", "2020-03-13"),
    ("Ireland", "2020-03-27"),
    ("Norway", "2020-03-12"),
    ("El Salvador", "2020-03-11"),
    ("Denmark", "2020-03-13"),
    ("Italy", "2020-03-10"),
    ("US", "2020-03-23"),
    ("Venezuela", "2020-03-17"),
];

static BUILTIN: Lazy<QuarantineReference> = Lazy::new(|| {
    QuarantineReference::from_dates(BUILTIN_DATES.iter().filter_map(|(country, date)| {
        NaiveDate::parse_from_str(date, ISO_DATE_FORMAT)
            .ok()
            .map(|date| (*country, date))
    }))
});

/// Country lockdown onset dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarantineReference {
    dates: BTreeMap<String, NaiveDate>,
}

impl QuarantineReference {
    /// The built-in table of national lockdown dates.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// A reference holding exactly the given dates.
    pub fn from_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = (S, NaiveDate)>,
        S: Into<String>,
    {
        Self {
            dates: dates
                .into_iter()
                .map(|(country, date)| (country.into(), date))
                .collect(),
        }
    }

    /// Layers ISO dated entries on top of this reference, replacing existing
    /// countries.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (country, date) in overrides {
            let date = parse_iso_date(date)?;
            debug!(country = %country, %date, "Quarantine date override");
            self.dates.insert(country.clone(), date);
        }
        Ok(self)
    }

    /// The lockdown date of a country.
    pub fn date_of(&self, country: &str) -> Option<NaiveDate> {
        self.dates.get(country).copied()
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether no dates are known.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Countries and dates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.dates.iter().map(|(country, date)| (country.as_str(), *date))
    }
}

/// Where a country's lockdown falls on its plotted series.
#[derive(Debug, Clone, PartialEq)]
pub enum QuarantineAnnotation {
    /// The lockdown date is a plotted row.
    Marked {
        day: usize,
        date: NaiveDate,
        record: DailyRecord,
    },
    /// The country has no lockdown date.
    NotListed,
    /// The lockdown date is before day zero, after the last plotted day, or
    /// missing from the series.
    OutOfRange {
        date: NaiveDate,
        day_zero: Option<NaiveDate>,
    },
}

impl QuarantineAnnotation {
    /// Day index of the marked row.
    pub fn day(&self) -> Option<usize> {
        match self {
            QuarantineAnnotation::Marked { day, .. } => Some(*day),
            _ => None,
        }
    }

    /// Whether the annotation is drawn.
    pub fn is_marked(&self) -> bool {
        matches!(self, QuarantineAnnotation::Marked { .. })
    }
}

/// Annotation of one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryAnnotation {
    pub country: String,
    pub annotation: QuarantineAnnotation,
}

/// Locates the lockdown date of `series.country` on the series.
///
/// The series is expected to be already restricted to the plotted day range.
pub fn annotate(series: &CountrySeries, reference: &QuarantineReference) -> QuarantineAnnotation {
    let Some(date) = reference.date_of(&series.country) else {
        return not_listed(&series.country);
    };

    match series.record_on(date) {
        Some(record) => QuarantineAnnotation::Marked {
            day: record.day,
            date,
            record: record.clone(),
        },
        None => out_of_range(&series.country, date, series.day_zero),
    }
}

/// Annotates every series of the map, in map order.
///
/// Empty series are never looked up: listed countries come back as
/// [`QuarantineAnnotation::OutOfRange`] without a day zero.
pub fn annotate_all(series: &SeriesMap, reference: &QuarantineReference) -> Vec<CountryAnnotation> {
    series
        .iter()
        .map(|country_series| {
            let annotation = if country_series.is_empty() {
                match reference.date_of(&country_series.country) {
                    Some(date) => out_of_range(&country_series.country, date, None),
                    None => not_listed(&country_series.country),
                }
            } else {
                annotate(country_series, reference)
            };
            CountryAnnotation {
                country: country_series.country.clone(),
                annotation,
            }
        })
        .collect()
}

fn not_listed(country: &str) -> QuarantineAnnotation {
    warn!(country, "{} not in quarantine list", country);
    QuarantineAnnotation::NotListed
}

fn out_of_range(country: &str, date: NaiveDate, day_zero: Option<NaiveDate>) -> QuarantineAnnotation {
    match day_zero {
        Some(day_zero) => warn!(
            country,
            quarantine_date = %date,
            day_zero = %day_zero,
            "{} quarantine date {} out of bounds. Day zero is {}",
            country, date, day_zero
        ),
        None => warn!(
            country,
            quarantine_date = %date,
            "{} quarantine date {} out of bounds. Series is empty",
            country, date
        ),
    }
    QuarantineAnnotation::OutOfRange { date, day_zero }
}
