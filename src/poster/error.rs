//! Form poster errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of an outbound form POST. Nothing is retried.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The configured endpoint is not a valid URL.
    #[error("invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, DNS, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
}

/// Result type for form poster operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
