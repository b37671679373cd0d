//! Cross-cutting error types for sonar-tools.
//!
//! Errors specific to HTTP access (`ClientError`) or configuration
//! (`ConfigError`) live in their own crates. Everything converges into
//! `anyhow::Error` in the `sqt` binary.

use thiserror::Error;

/// Errors that can be raised by any sonar-tools crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Object lookup returned no result.
    #[error("{object_type} key '{key}' not found")]
    NotFound { object_type: String, key: String },

    /// A version string could not be parsed into numeric components.
    #[error("Invalid version string: '{0}'")]
    InvalidVersion(String),

    /// A server timestamp could not be parsed.
    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
