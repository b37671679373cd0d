//! # sq-config
//!
//! Layered configuration loading for sonar-tools using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SQT_*` prefix, `__` as separator)
//! 2. `SONAR_HOST_URL` / `SONAR_TOKEN`
//! 3. Project-level `.sonar-tools/config.toml`
//! 4. User-level `~/.config/sonar-tools/config.toml`
//! 5. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SQT_SERVER__URL` -> `server.url`,
//! `SQT_AUDIT__TOKEN_MAX_AGE` -> `audit.token_max_age`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sq_config::SonarConfig;
//!
//! let config = SonarConfig::load_with_dotenv().expect("config");
//! println!("server: {}", config.server.base_url());
//! ```

mod audit;
mod error;
mod general;
mod housekeeper;
mod server;

pub use audit::AuditConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use housekeeper::{HousekeeperConfig, MIN_PROJECTS_MAX_AGE};
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SonarConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub housekeeper: HousekeeperConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SonarConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does not read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source is malformed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the current directory, then all other sources.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".sonar-tools/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(Self::sonar_scanner_env())
            .merge(Env::prefixed("SQT_").split("__"))
    }

    /// The variables SonarScanner already reads, mapped into `[server]`.
    fn sonar_scanner_env() -> Env {
        Env::raw()
            .only(&["SONAR_HOST_URL", "SONAR_TOKEN"])
            .map(|key| {
                if key.as_str().eq_ignore_ascii_case("SONAR_TOKEN") {
                    "server.token".into()
                } else {
                    "server.url".into()
                }
            })
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sonar-tools").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = SonarConfig::default();
        assert_eq!(config.server.url, "http://localhost:9000");
        assert!(config.audit.projects);
        assert_eq!(config.housekeeper.projects_max_age, 365);
        assert_eq!(config.general.page_size, 100);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: SonarConfig = SonarConfig::figment().extract()?;
            assert_eq!(config.general.csv_separator, ',');
            assert_eq!(config.server.timeout_secs, 60);
            Ok(())
        });
    }
}
