//! Raw observations and processed per-country series.

use crate::column::Metric;
use chrono::NaiveDate;
use epicurve_common::{DayRange, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One row of the source table: cumulative counts for a country on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Confirmed")]
    pub confirmed: u64,
    #[serde(rename = "Recovered")]
    pub recovered: u64,
    #[serde(rename = "Deaths")]
    pub deaths: u64,
}

/// The wide source table for every country and date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<RawObservation>,
}

impl RawTable {
    /// Wraps already parsed rows.
    pub fn new(rows: Vec<RawObservation>) -> Self {
        Self { rows }
    }

    /// Parses a `Date,Country,Confirmed,Recovered,Deaths` CSV document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize()
            .collect::<std::result::Result<Vec<RawObservation>, _>>()?;
        Ok(Self { rows })
    }

    /// All rows in source order.
    pub fn rows(&self) -> &[RawObservation] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one country, in source order.
    pub fn for_country<'a>(&'a self, country: &'a str) -> impl Iterator<Item = &'a RawObservation> + 'a {
        self.rows.iter().filter(move |row| row.country == country)
    }

    /// Distinct country names in order of first appearance.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.country.as_str()) {
                seen.push(&row.country);
            }
        }
        seen
    }

    /// Latest date present in the table.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|row| row.date).max()
    }
}

impl FromIterator<RawObservation> for RawTable {
    fn from_iter<I: IntoIterator<Item = RawObservation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A processed row of a country series.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub country: String,
    pub confirmed: u64,
    pub recovered: u64,
    pub deaths: u64,
    /// Confirmed minus recovered minus deaths; negative on inconsistent source data.
    pub infected: i64,
    pub recovered_per_confirmed: f64,
    pub deaths_per_confirmed: f64,
    pub infected_per_confirmed: f64,
    pub confirmed_per_population: f64,
    pub recovered_per_population: f64,
    pub deaths_per_population: f64,
    pub infected_per_population: f64,
    /// Daily increase or percentage increase of the show column, if requested.
    pub derived: Option<f64>,
    /// Zero-based index from day zero.
    pub day: usize,
}

impl DailyRecord {
    /// Value of a numeric column.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Confirmed => self.confirmed as f64,
            Metric::Recovered => self.recovered as f64,
            Metric::Deaths => self.deaths as f64,
            Metric::Infected => self.infected as f64,
            Metric::RecoveredPerConfirmed => self.recovered_per_confirmed,
            Metric::DeathsPerConfirmed => self.deaths_per_confirmed,
            Metric::InfectedPerConfirmed => self.infected_per_confirmed,
            Metric::ConfirmedPerPopulation => self.confirmed_per_population,
            Metric::RecoveredPerPopulation => self.recovered_per_population,
            Metric::DeathsPerPopulation => self.deaths_per_population,
            Metric::InfectedPerPopulation => self.infected_per_population,
        }
    }
}

/// The processed series of one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    /// Name of the derived column carried in [`DailyRecord::derived`].
    pub derived_column: Option<String>,
    /// Calendar date of day zero, kept when the day range drops it.
    pub day_zero: Option<NaiveDate>,
    pub records: Vec<DailyRecord>,
}

impl CountrySeries {
    /// An empty series: the threshold was never reached.
    pub fn empty(country: impl Into<String>, derived_column: Option<String>) -> Self {
        Self {
            country: country.into(),
            derived_column,
            day_zero: None,
            records: Vec::new(),
        }
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Highest day index present.
    pub fn last_day(&self) -> Option<usize> {
        self.records.last().map(|record| record.day)
    }

    /// The row for a calendar date.
    pub fn record_on(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.iter().find(|record| record.date == date)
    }

    /// A copy restricted to the days in `range`. Day indices are not renumbered.
    pub fn restrict(&self, range: DayRange) -> Self {
        Self {
            country: self.country.clone(),
            derived_column: self.derived_column.clone(),
            day_zero: self.day_zero,
            records: self
                .records
                .iter()
                .filter(|record| range.contains(record.day))
                .cloned()
                .collect(),
        }
    }
}

/// Per-country series in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesMap {
    series: Vec<CountrySeries>,
}

impl SeriesMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a series, replacing any existing series for the same country in place.
    pub fn insert(&mut self, series: CountrySeries) {
        match self.series.iter_mut().find(|s| s.country == series.country) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    /// The series of a country.
    pub fn get(&self, country: &str) -> Option<&CountrySeries> {
        self.series.iter().find(|s| s.country == country)
    }

    /// Whether a country is present.
    pub fn contains(&self, country: &str) -> bool {
        self.get(country).is_some()
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether there are no countries.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CountrySeries> {
        self.series.iter()
    }

    /// Every series restricted to `range`.
    pub fn restrict(&self, range: DayRange) -> Self {
        Self {
            series: self.series.iter().map(|s| s.restrict(range)).collect(),
        }
    }

    /// Consumes the map, returning the series in order.
    pub fn into_vec(self) -> Vec<CountrySeries> {
        self.series
    }
}

impl<'a> IntoIterator for &'a SeriesMap {
    type Item = &'a CountrySeries;
    type IntoIter = std::slice::Iter<'a, CountrySeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<CountrySeries> for SeriesMap {
    fn from_iter<I: IntoIterator<Item = CountrySeries>>(iter: I) -> Self {
        let mut map = Self::new();
        for series in iter {
            map.insert(series);
        }
        map
    }
}
