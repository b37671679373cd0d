use anyhow::Context;
use sq_config::SonarConfig;

use crate::cli::GlobalFlags;

/// Load configuration from `.env`, files and environment, then apply the
/// command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SonarConfig> {
    load_dotenv()?;
    let config = SonarConfig::load().context("failed to load configuration")?;
    let config = apply_overrides(config, flags);
    config
        .server
        .validate()
        .context("invalid server configuration")?;
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(error).context("failed to load .env"),
    }
}

fn apply_overrides(mut config: SonarConfig, flags: &GlobalFlags) -> SonarConfig {
    if let Some(url) = &flags.url {
        config.server.url.clone_from(url);
    }
    if let Some(token) = &flags.token {
        config.server.token.clone_from(token);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(url: Option<&str>, token: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            url: url.map(str::to_string),
            token: token.map(str::to_string),
            format: None,
            file: None,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn flags_override_configuration() {
        let mut config = SonarConfig::default();
        config.server.token = "from-config".into();

        let config = apply_overrides(config, &flags(Some("https://sonar.example.com"), None));
        assert_eq!(config.server.url, "https://sonar.example.com");
        assert_eq!(config.server.token, "from-config");

        let config = apply_overrides(config, &flags(None, Some("squ_cli")));
        assert_eq!(config.server.token, "squ_cli");
    }
}
