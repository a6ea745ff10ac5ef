//! # epicurve cli
//!
//! Command line front-end: fetches and caches the raw data, writes the
//! processed series and renders charts.

#![warn(clippy::all)]

pub mod app;
pub mod args;
pub mod error;

pub use app::{logging_config, resolve_config, run, App};
pub use args::{ChartArgs, Cli, Command, QueryArgs};
pub use error::{CliError, CliResult};
