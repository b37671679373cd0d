//! Client error types.

use sq_core::errors::CoreError;
use thiserror::Error;

/// Errors that can occur when calling the SonarQube web API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// First error message of the response, or the raw body.
        message: String,
    },

    /// 401 or 403: missing token or insufficient permissions.
    #[error("not authorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// 404: the object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// The operation does not exist on this server edition or version.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A search matched more results than the server lets a client page through.
    #[error("search returned {total} results, more than the {limit} the server can page through")]
    TooManyResults { total: u64, limit: u64 },

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
