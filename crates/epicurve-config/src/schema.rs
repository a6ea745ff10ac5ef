//! Configuration schema definitions using serde with validation attributes.

use epicurve_common::DayRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Main configuration structure for epicurve.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Where the raw data and reference tables come from.
    #[validate]
    pub data: DataConfig,
    /// Which series to build.
    #[validate]
    pub query: QueryConfig,
    /// How to render the chart.
    #[validate]
    pub chart: ChartSettings,
    /// Extra or overriding lockdown start dates (`country -> YYYY-MM-DD`).
    pub quarantine: BTreeMap<String, String>,
    /// Logging configuration.
    #[validate]
    pub logging: LoggingSettings,
}

/// Data source and local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Datapackage descriptor URL.
    #[validate(custom(
        function = "crate::validation::validate_http_url",
        message = "Source URL must be an http(s) URL"
    ))]
    pub source_url: String,

    /// Name of the resource inside the datapackage.
    #[validate(length(min = 1, message = "Resource name cannot be empty"))]
    pub resource_name: String,

    /// Base path of the local cache; the full name is `{base}{YYYY-MM-DD}.csv`.
    #[validate(length(min = 1, message = "Cache base path cannot be empty"))]
    pub cache_base: String,

    /// Semicolon separated population table.
    #[validate(length(min = 1, message = "Population file cannot be empty"))]
    pub population_file: String,

    /// Request timeout in seconds.
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub request_timeout_seconds: u64,
}

/// Series selection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QueryConfig {
    /// Threshold indicator (`Date`, `Confirmed`, `Deaths/Total Population`, ...).
    #[validate(length(min = 1, message = "Indicator cannot be empty"))]
    pub indicator: String,

    /// Day zero is the first day with `indicator >= min_indicator`.
    pub min_indicator: f64,

    /// Column to display; defaults to the indicator.
    pub show: Option<String>,

    /// `cumulative`, `daily increase` or `daily percentage increase`.
    pub display_mode: String,

    /// Countries to build, in legend order.
    #[validate(length(min = 1, message = "At least one country is required"))]
    pub countries: Vec<String>,

    /// Days to plot.
    pub day_range: DayRange,

    /// Logarithmic y axis.
    pub log_scale: bool,
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartSettings {
    /// `bitmap` (PNG) or `html` (interactive SVG page).
    pub backend: String,

    /// `line` or `bar`.
    pub mode: String,

    /// Named colour scheme: default, dark, light, vibrant or monochrome.
    /// Ignored when `palette` is set.
    pub scheme: String,

    /// Image width in pixels.
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Image height in pixels.
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Series colours, assigned to countries in order. Empty uses the built-in palette.
    #[validate(custom(
        function = "crate::validation::validate_palette",
        message = "Palette entries must be hex colours like #1f77b4"
    ))]
    pub palette: Vec<String>,

    /// Background colour.
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Background color must be valid hex color"
    ))]
    pub background: String,

    /// Title font size.
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub title_font_size: u32,

    /// Draw grid lines.
    pub show_grid: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error).
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Emit JSON lines instead of human readable output.
    pub json: bool,

    /// Multi-line pretty output. Ignored with `json`.
    pub pretty: bool,

    /// Log span open and close events.
    pub spans: bool,

    /// Optional log file path.
    pub file: Option<String>,
}

impl Config {
    /// Comprehensive validation of the entire configuration.
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;

        let mut errors = validator::ValidationErrors::new();
        for date in self.quarantine.values() {
            if let Err(err) = crate::validation::validate_iso_date(date) {
                errors.add("quarantine", err);
            }
        }
        if let Some(max) = self.query.day_range.max {
            if max < self.query.day_range.min {
                errors.add(
                    "day_range",
                    validator::ValidationError::new("day_range_max_before_min"),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
