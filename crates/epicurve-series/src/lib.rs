//! # epicurve series
//!
//! Turns the raw per-country cumulative counts into day-zero aligned series:
//! derived ratio and per-capita columns, threshold filtering, daily
//! increase views and quarantine annotation. Also owns the local CSV cache,
//! the population reference and the remote datapackage source.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod cache;
pub mod column;
pub mod display;
pub mod model;
pub mod population;
pub mod quarantine;
pub mod source;

pub use builder::{SeriesBuilder, SeriesRequest};
pub use cache::{cache_path, read_cached, read_raw, read_series, save_cached, write_raw, write_series};
pub use column::{Indicator, Metric, COUNTRY_COLUMN, DATE_COLUMN, DAY_COLUMN};
pub use display::DisplayMode;
pub use model::{CountrySeries, DailyRecord, RawObservation, RawTable, SeriesMap};
pub use population::PopulationTable;
pub use quarantine::{annotate, annotate_all, CountryAnnotation, QuarantineAnnotation, QuarantineReference};
pub use source::{resolve_resource_path, DataSource};
