//! Command line arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use epicurve_common::{parse_iso_date, DayRange};
use epicurve_config::{ChartSettings, Config, QueryConfig};
use std::path::PathBuf;

/// Day-zero aligned epidemic curves.
#[derive(Parser, Debug)]
#[command(name = "epicurve", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "EPICURVE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Read raw data cached on this date instead of downloading it
    #[arg(long, global = true, value_parser = parse_date)]
    pub cache_date: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the raw data and store it in the local cache
    Fetch {
        /// Cache date, today when omitted
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Build the processed series and write them as CSV
    Series {
        #[command(flatten)]
        query: QueryArgs,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Build, annotate and render a chart
    Plot {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        chart: ChartArgs,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Query flags overriding the `query` section.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Threshold column, or "Date" for calendar dates
    #[arg(long)]
    pub indicator: Option<String>,

    /// Threshold value for the indicator
    #[arg(long = "min")]
    pub min_indicator: Option<f64>,

    /// Plotted column
    #[arg(long)]
    pub show: Option<String>,

    /// Display mode: cumulative, daily-increase or daily-percentage-increase
    #[arg(long)]
    pub mode: Option<String>,

    /// Country to include, repeatable
    #[arg(long = "country")]
    pub countries: Vec<String>,

    /// First day to keep
    #[arg(long)]
    pub day_min: Option<usize>,

    /// Last day to keep
    #[arg(long)]
    pub day_max: Option<usize>,

    /// Use a linear y axis
    #[arg(long)]
    pub linear: bool,
}

impl QueryArgs {
    pub fn apply(&self, query: &mut QueryConfig) {
        if let Some(indicator) = &self.indicator {
            query.indicator = indicator.clone();
        }
        if let Some(min) = self.min_indicator {
            query.min_indicator = min;
        }
        if self.show.is_some() {
            query.show = self.show.clone();
        }
        if let Some(mode) = &self.mode {
            query.display_mode = mode.clone();
        }
        if !self.countries.is_empty() {
            query.countries = self.countries.clone();
        }
        if self.day_min.is_some() || self.day_max.is_some() {
            query.day_range = DayRange::new(
                self.day_min.unwrap_or(query.day_range.min),
                self.day_max.or(query.day_range.max),
            );
        }
        if self.linear {
            query.log_scale = false;
        }
    }
}

/// Rendering flags overriding the `chart` section.
#[derive(Args, Debug, Clone, Default)]
pub struct ChartArgs {
    /// Output back-end: html or bitmap
    #[arg(long)]
    pub backend: Option<String>,

    /// Chart mode: line or bar
    #[arg(long)]
    pub chart_mode: Option<String>,

    /// Colour scheme: default, dark, light, vibrant or monochrome
    #[arg(long)]
    pub scheme: Option<String>,
}

impl ChartArgs {
    pub fn apply(&self, chart: &mut ChartSettings) {
        if let Some(backend) = &self.backend {
            chart.backend = backend.clone();
        }
        if let Some(mode) = &self.chart_mode {
            chart.mode = mode.clone();
        }
        if let Some(scheme) = &self.scheme {
            chart.scheme = scheme.clone();
        }
    }
}

impl Cli {
    /// Applies command line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        match &self.command {
            Command::Fetch { .. } => {}
            Command::Series { query, .. } => query.apply(&mut config.query),
            Command::Plot { query, chart, .. } => {
                query.apply(&mut config.query);
                chart.apply(&mut config.chart);
            }
        }
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    parse_iso_date(input).map_err(|e| e.to_string())
}
