//! Audit error types.

use sq_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// A collection-wide lookup failed (per-object failures are only logged).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A configured exclusion pattern is not a valid regular expression.
    #[error("invalid exclusion pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The system info file could not be read or is not JSON.
    #[error("invalid system info file: {0}")]
    Sif(String),
}
