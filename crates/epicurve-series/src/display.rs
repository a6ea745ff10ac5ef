//! Cumulative and daily views of a series.

use crate::column::Metric;
use epicurve_common::{EpiError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// How the show column is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// The cumulative values as reported.
    #[default]
    Cumulative,
    /// Row-over-row difference.
    DailyIncrease,
    /// Row-over-row fractional change.
    DailyPercentageIncrease,
}

impl DisplayMode {
    /// Every mode.
    pub const ALL: [DisplayMode; 3] = [
        DisplayMode::Cumulative,
        DisplayMode::DailyIncrease,
        DisplayMode::DailyPercentageIncrease,
    ];

    /// Mode name as used in labels and derived column names.
    pub const fn name(self) -> &'static str {
        match self {
            DisplayMode::Cumulative => "cumulative",
            DisplayMode::DailyIncrease => "daily increase",
            DisplayMode::DailyPercentageIncrease => "daily percentage increase",
        }
    }

    /// Parses a mode name, falling back to [`DisplayMode::Cumulative`] with a
    /// warning when the name is not recognised.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(mode = name, "Display mode unknown, using cumulative");
            DisplayMode::Cumulative
        })
    }

    /// Whether this mode adds a derived column.
    pub const fn is_derived(self) -> bool {
        !matches!(self, DisplayMode::Cumulative)
    }

    /// Name of the derived column for `show`, e.g. `Confirmed daily increase`.
    pub fn derived_column(self, show: Metric) -> Option<String> {
        self.is_derived()
            .then(|| format!("{} {}", show.name(), self.name()))
    }

    /// Derived value of a row from its predecessor's show value.
    pub fn derive(self, previous: f64, current: f64) -> Option<f64> {
        match self {
            DisplayMode::Cumulative => None,
            DisplayMode::DailyIncrease => Some(current - previous),
            DisplayMode::DailyPercentageIncrease => Some((current - previous) / previous),
        }
    }

    /// Derived column over a whole show column. The first entry is always missing.
    pub fn derive_all(self, show: &[f64]) -> Vec<Option<f64>> {
        let mut derived = Vec::with_capacity(show.len());
        if show.is_empty() {
            return derived;
        }
        derived.push(None);
        derived.extend(show.windows(2).map(|pair| self.derive(pair[0], pair[1])));
        derived
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayMode {
    type Err = EpiError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace(['-', '_'], " ");
        DisplayMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| EpiError::validation_field(format!("Unknown display mode '{wanted}'"), "display_mode"))
    }
}
