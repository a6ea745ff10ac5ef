//! Test utilities and shared fixtures.
//!
//! Available to other crates through the `testing` feature.

use chrono::NaiveDate;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Calendar date shorthand for fixtures.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Raw source tables and reference data used across the workspace tests.
pub mod fixtures {
    /// Raw table with two countries on five consecutive days.
    ///
    /// Ruritania crosses `Confirmed >= 1` on 2020-03-03.
    pub const RAW_CSV: &str = "\
Date,Country,Confirmed,Recovered,Deaths
2020-03-01,Ruritania,0,0,0
2020-03-01,Freedonia,2,0,0
2020-03-02,Ruritania,0,0,0
2020-03-02,Freedonia,4,1,0
2020-03-03,Ruritania,5,0,0
2020-03-03,Freedonia,8,1,1
2020-03-04,Ruritania,10,1,0
2020-03-04,Freedonia,16,2,1
2020-03-05,Ruritania,20,2,1
2020-03-05,Freedonia,32,4,2
";

    /// Semicolon separated population table (thousands of people).
    pub const POPULATION_CSV: &str = "\
Country;Population 2020;Yearly Change
Ruritania;1000;0.5
Freedonia;2000.5;1.1
Grand Fenwick;0.5;0.0
";

    /// Datapackage descriptor with a single CSV resource.
    pub fn datapackage_json(csv_url: &str) -> String {
        format!(
            r#"{{
  "name": "covid-19",
  "resources": [
    {{ "name": "time-series-19-covid-combined_csv", "path": "https://example.invalid/combined.csv" }},
    {{ "name": "countries-aggregated_csv", "path": "{csv_url}", "format": "csv" }}
  ]
}}"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0001, 0.001);
        assert_approx_eq(1.0, 0.9999, 0.001);
    }

    #[test]
    #[should_panic]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, 0.05);
    }

    #[test]
    fn test_fixture_shapes() {
        assert_eq!(fixtures::RAW_CSV.lines().count(), 11);
        assert!(fixtures::POPULATION_CSV.starts_with("Country;Population 2020"));
        assert!(fixtures::datapackage_json("http://x/y.csv").contains("http://x/y.csv"));
    }
}
