//! # epicurve config
//!
//! YAML configuration for epicurve: data locations, the series query,
//! chart settings, quarantine overrides and logging.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use defaults::*;
pub use loader::{ConfigError, ConfigLoader, CONFIG_PATH_VAR};
pub use schema::*;
