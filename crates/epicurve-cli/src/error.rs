//! Error types for the command line front-end.

use epicurve_common::EpiError;
use epicurve_config::ConfigError;
use thiserror::Error;

/// Errors raised while running a command.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Epi(#[from] EpiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type CliResult<T> = Result<T, CliError>;
