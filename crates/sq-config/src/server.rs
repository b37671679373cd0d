//! Server connection settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_url() -> String {
    "http://localhost:9000".to_string()
}

/// Default HTTP request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Root URL of the server, without the `/api` suffix.
    #[serde(default = "default_url")]
    pub url: String,

    /// User token, sent as the basic-auth user name.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// The URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Check that the URL is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for an empty URL and
    /// [`ConfigError::InvalidValue`] for a non-HTTP(S) one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::NotConfigured {
                field: "server.url".into(),
            });
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "server.url".into(),
                reason: format!("'{}' is not an http(s) URL", self.url),
            });
        }
        Ok(())
    }
}
