//! Named columns of a processed series.
//!
//! Column names match the headers of the processed CSV output, so
//! `"Deaths/Confirmed"` and `"Infected/Total Population"` parse to the
//! corresponding [`Metric`].

use epicurve_common::{EpiError, LookupKind, Result};
use std::fmt;
use std::str::FromStr;

/// Header of the calendar date column.
pub const DATE_COLUMN: &str = "Date";
/// Header of the country column.
pub const COUNTRY_COLUMN: &str = "Country";
/// Header of the relative day column.
pub const DAY_COLUMN: &str = "Day";

/// A numeric column, raw or derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Confirmed,
    Recovered,
    Deaths,
    Infected,
    RecoveredPerConfirmed,
    DeathsPerConfirmed,
    InfectedPerConfirmed,
    ConfirmedPerPopulation,
    RecoveredPerPopulation,
    DeathsPerPopulation,
    InfectedPerPopulation,
}

impl Metric {
    /// Every metric in output column order.
    pub const ALL: [Metric; 11] = [
        Metric::Confirmed,
        Metric::Recovered,
        Metric::Deaths,
        Metric::Infected,
        Metric::RecoveredPerConfirmed,
        Metric::DeathsPerConfirmed,
        Metric::InfectedPerConfirmed,
        Metric::ConfirmedPerPopulation,
        Metric::RecoveredPerPopulation,
        Metric::DeathsPerPopulation,
        Metric::InfectedPerPopulation,
    ];

    /// Column header.
    pub const fn name(self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed",
            Metric::Recovered => "Recovered",
            Metric::Deaths => "Deaths",
            Metric::Infected => "Infected",
            Metric::RecoveredPerConfirmed => "Recovered/Confirmed",
            Metric::DeathsPerConfirmed => "Deaths/Confirmed",
            Metric::InfectedPerConfirmed => "Infected/Confirmed",
            Metric::ConfirmedPerPopulation => "Confirmed/Total Population",
            Metric::RecoveredPerPopulation => "Recovered/Total Population",
            Metric::DeathsPerPopulation => "Deaths/Total Population",
            Metric::InfectedPerPopulation => "Infected/Total Population",
        }
    }

    /// Whether the column comes straight from the source table.
    pub const fn is_raw(self) -> bool {
        matches!(self, Metric::Confirmed | Metric::Recovered | Metric::Deaths)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = EpiError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EpiError::lookup(LookupKind::Column, wanted))
    }
}

/// The column used to pick day zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// The calendar date column: no threshold, every row is kept.
    Date,
    /// A numeric column compared against the minimum.
    Metric(Metric),
}

impl Indicator {
    /// Column header.
    pub const fn name(self) -> &'static str {
        match self {
            Indicator::Date => DATE_COLUMN,
            Indicator::Metric(metric) => metric.name(),
        }
    }

    /// The metric behind this indicator, if any.
    pub const fn metric(self) -> Option<Metric> {
        match self {
            Indicator::Date => None,
            Indicator::Metric(metric) => Some(metric),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Indicator {
    type Err = EpiError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case(DATE_COLUMN) {
            Ok(Indicator::Date)
        } else {
            s.parse().map(Indicator::Metric)
        }
    }
}

impl From<Metric> for Indicator {
    fn from(metric: Metric) -> Self {
        Indicator::Metric(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_metric_parse_is_case_insensitive() {
        assert_eq!("deaths/confirmed".parse::<Metric>().unwrap(), Metric::DeathsPerConfirmed);
        assert_eq!(
            " Infected/Total Population ".parse::<Metric>().unwrap(),
            Metric::InfectedPerPopulation
        );
    }

    #[test]
    fn test_unknown_metric_is_lookup_failure() {
        let err = "Cured".parse::<Metric>().unwrap_err();
        assert_eq!(err.lookup_kind(), Some(LookupKind::Column));
    }

    #[test]
    fn test_indicator_parse() {
        assert_eq!("Date".parse::<Indicator>().unwrap(), Indicator::Date);
        assert_eq!(
            "Confirmed".parse::<Indicator>().unwrap(),
            Indicator::Metric(Metric::Confirmed)
        );
        assert!("Country".parse::<Indicator>().is_err());
        assert_eq!(Indicator::Date.metric(), None);
    }

    #[test]
    fn test_raw_metrics() {
        let raw: Vec<_> = Metric::ALL.into_iter().filter(|m| m.is_raw()).collect();
        assert_eq!(raw, vec![Metric::Confirmed, Metric::Recovered, Metric::Deaths]);
    }
}
