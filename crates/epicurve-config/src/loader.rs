//! Configuration loading utilities

use crate::Config;
use epicurve_common::{EpiError, Result as EpiResult};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable pointing at a configuration file.
pub const CONFIG_PATH_VAR: &str = "EPICURVE_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for EpiError {
    fn from(err: ConfigError) -> Self {
        EpiError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading configuration file");
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse a YAML document. Missing sections and fields take their defaults.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from the environment, a default file, or defaults
    pub fn load() -> EpiResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::load_config(&config_path)?
        } else if Path::new("epicurve.yaml").exists() {
            Self::load_config("epicurve.yaml")?
        } else if Path::new("epicurve.yml").exists() {
            Self::load_config("epicurve.yml")?
        } else {
            debug!("No configuration file found, using defaults");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> EpiResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("EPICURVE_SOURCE_URL") {
            config.data.source_url = url;
        }

        if let Ok(base) = env::var("EPICURVE_CACHE_BASE") {
            config.data.cache_base = base;
        }

        if let Ok(file) = env::var("EPICURVE_POPULATION_FILE") {
            config.data.population_file = file;
        }

        if let Ok(timeout) = env::var("EPICURVE_TIMEOUT") {
            config.data.request_timeout_seconds =
                timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "EPICURVE_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(countries) = env::var("EPICURVE_COUNTRIES") {
            config.query.countries = countries
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(level) = env::var("EPICURVE_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_document() {
        let yaml = r#"
query:
  indicator: "Deaths"
  min_indicator: 10
  countries: ["Spain", "France"]
  day_range:
    min: 0
    max: 40
chart:
  backend: bitmap
quarantine:
  Ruritania: "2020-03-04"
"#;
        let config = ConfigLoader::parse(yaml).unwrap();
        assert_eq!(config.query.indicator, "Deaths");
        assert_eq!(config.query.min_indicator, 10.0);
        assert_eq!(config.query.countries, vec!["Spain", "France"]);
        assert_eq!(config.query.day_range.max, Some(40));
        assert_eq!(config.chart.backend, "bitmap");
        // Untouched fields keep their defaults
        assert_eq!(config.query.display_mode, "cumulative");
        assert_eq!(config.chart.mode, "line");
        assert_eq!(config.quarantine["Ruritania"], "2020-03-04");
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_parse_empty_document() {
        let config = ConfigLoader::parse("   \n").unwrap();
        assert_eq!(config.query.indicator, "Confirmed");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = ConfigLoader::parse("query: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_quarantine_date_fails_validation() {
        let yaml = "quarantine:\n  Ruritania: \"04/03/2020\"\n";
        let config = ConfigLoader::parse(yaml).unwrap();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_empty_country_list_fails_validation() {
        let yaml = "query:\n  countries: []\n";
        let config = ConfigLoader::parse(yaml).unwrap();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_inverted_day_range_fails_validation() {
        let yaml = "query:\n  day_range:\n    min: 10\n    max: 5\n";
        let config = ConfigLoader::parse(yaml).unwrap();
        assert!(config.validate_all().is_err());
    }
}
