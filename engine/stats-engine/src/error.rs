//! Error types for the stats engine

use thiserror::Error;

/// Result type for stats engine operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that can occur in the stats engine.
///
/// Data problems never surface here: bad or missing fields are defaulted by the
/// normalizer. Only configuration and caller mistakes are errors.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown stat: {0}")]
    UnknownStat(String),
}
