//! Error types for the fetcher

use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors raised at the upstream boundary.
///
/// None of these reach the stats engine: the dashboard turns them into an
/// unavailable status over an empty board.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failures, timeouts included
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload parsed but carried no usable table
    #[error("Payload has no result set: {0}")]
    MissingResultSet(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FetchError {
    pub fn missing_result_set(msg: impl Into<String>) -> Self {
        Self::MissingResultSet(msg.into())
    }

    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
