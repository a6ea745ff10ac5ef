//! Common type definitions shared across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of "Day" indices to keep when plotting.
///
/// `max = None` keeps every day from `min` onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    /// First day to keep.
    #[serde(default)]
    pub min: usize,
    /// Last day to keep, unbounded when absent.
    #[serde(default)]
    pub max: Option<usize>,
}

impl DayRange {
    /// Every day.
    pub const ALL: Self = Self { min: 0, max: None };

    /// Creates a range from `min` to an optional inclusive `max`.
    pub const fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Whether `day` falls inside the range.
    pub fn contains(&self, day: usize) -> bool {
        day >= self.min && self.max.map_or(true, |max| day <= max)
    }
}

impl Default for DayRange {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..={}", self.min, max),
            None => write!(f, "{}..", self.min),
        }
    }
}
