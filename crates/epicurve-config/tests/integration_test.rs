//! Integration tests for epicurve-config crate.

use epicurve_config::{ConfigLoader, DEFAULT_SOURCE_URL};
use std::io::Write;

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r##"
data:
  cache_base: "cache/covid_"
query:
  indicator: "Deaths/Total Population"
  min_indicator: 0.000001
  show: "Deaths"
  display_mode: "daily increase"
  countries: ["Italy"]
  log_scale: false
chart:
  mode: bar
  scheme: vibrant
  palette: ["#1f77b4"]
logging:
  level: debug
  pretty: true
  spans: true
"##
    )
    .expect("write config");

    let config = ConfigLoader::load_from_file(file.path()).expect("load config");
    assert_eq!(config.data.cache_base, "cache/covid_");
    assert_eq!(config.data.source_url, DEFAULT_SOURCE_URL);
    assert_eq!(config.query.indicator, "Deaths/Total Population");
    assert_eq!(config.query.show.as_deref(), Some("Deaths"));
    assert_eq!(config.query.display_mode, "daily increase");
    assert!(!config.query.log_scale);
    assert_eq!(config.chart.mode, "bar");
    assert_eq!(config.chart.scheme, "vibrant");
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.pretty);
    assert!(config.logging.spans);
}

#[test]
fn test_load_config_rejects_bad_palette() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "chart:\n  palette: [\"blue\"]\n").expect("write config");

    let result = ConfigLoader::load_from_file(file.path());
    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let result = ConfigLoader::load_from_file("/definitely/not/here/epicurve.yaml");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}
