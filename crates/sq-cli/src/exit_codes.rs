//! Process exit codes.
//!
//! 0 is success and 2 is left to clap for invalid arguments. Fatal errors
//! reach `main` as `anyhow::Error`; the code is taken from the first
//! [`CliError`] in the chain, else derived from the library error that
//! caused the failure.

use sq_audit::AuditError;
use sq_client::ClientError;
use sq_config::ConfigError;
use thiserror::Error;

pub const GENERAL: i32 = 1;
pub const CONFIG: i32 = 3;
pub const CONNECTION: i32 = 4;
pub const UNSUPPORTED_OPERATION: i32 = 5;
pub const NO_SUCH_KEY: i32 = 6;
pub const SIF_AUDIT: i32 = 7;

/// A fatal error that carries its exit code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    pub code: i32,
    message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(UNSUPPORTED_OPERATION, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(CONFIG, message)
    }
}

const fn for_client_error(error: &ClientError) -> i32 {
    match error {
        ClientError::Http(_)
        | ClientError::Api { .. }
        | ClientError::Unauthorized { .. }
        | ClientError::RateLimited { .. } => CONNECTION,
        ClientError::NotFound(_) => NO_SUCH_KEY,
        ClientError::UnsupportedOperation(_) => UNSUPPORTED_OPERATION,
        ClientError::InvalidUrl(_) => CONFIG,
        ClientError::Parse(_) | ClientError::TooManyResults { .. } | ClientError::Core(_) => {
            GENERAL
        }
    }
}

/// Exit code of a failed run.
pub fn for_error(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.code;
        }
        if let Some(e) = cause.downcast_ref::<ClientError>() {
            return for_client_error(e);
        }
        if let Some(e) = cause.downcast_ref::<AuditError>() {
            return match e {
                AuditError::Client(inner) => for_client_error(inner),
                AuditError::Pattern { .. } => CONFIG,
                AuditError::Sif(_) => SIF_AUDIT,
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return CONFIG;
        }
    }
    GENERAL
}
