//! Default values.

use crate::schema::*;
use epicurve_common::DayRange;

/// Default datapackage descriptor.
pub const DEFAULT_SOURCE_URL: &str = "https://datahub.io/core/covid-19/datapackage.json";

/// Default resource inside the datapackage.
pub const DEFAULT_RESOURCE_NAME: &str = "countries-aggregated_csv";

/// Default countries when none are configured.
pub const DEFAULT_COUNTRIES: [&str; 3] = ["Colombia", "Italy", "US"];

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            resource_name: DEFAULT_RESOURCE_NAME.to_string(),
            cache_base: "data/covid_data_".to_string(),
            population_file: "data/world_population_2020.csv".to_string(),
            request_timeout_seconds: 60,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            indicator: "Confirmed".to_string(),
            min_indicator: 1.0,
            show: None,
            display_mode: "cumulative".to_string(),
            countries: DEFAULT_COUNTRIES.iter().map(|c| (*c).to_string()).collect(),
            day_range: DayRange::ALL,
            log_scale: true,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            backend: "html".to_string(),
            mode: "line".to_string(),
            scheme: "default".to_string(),
            width: 1200,
            height: 700,
            palette: Vec::new(),
            background: "#ffffff".to_string(),
            title_font_size: 20,
            show_grid: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            pretty: false,
            spans: false,
            file: None,
        }
    }
}
