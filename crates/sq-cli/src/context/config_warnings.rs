use sq_config::SonarConfig;

/// Emit warnings for configuration that silently fell back to defaults.
pub fn warn_unconfigured(config: &SonarConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

const SECTIONS: [&str; 4] = ["SERVER", "AUDIT", "HOUSEKEEPER", "GENERAL"];

fn collect_unconfigured_warnings<I>(config: &SonarConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    for key in &env_keys {
        let Some(rest) = key.strip_prefix("SQT_") else {
            continue;
        };
        let single_underscore = SECTIONS.iter().any(|section| {
            rest.strip_prefix(section)
                .is_some_and(|tail| tail.starts_with('_') && !tail.starts_with("__"))
        });
        if single_underscore {
            warnings.push(format!(
                "{key} is ignored. Use double underscores between section and field (example: SQT_SERVER__TOKEN)."
            ));
        }
    }

    if !config.server.has_token() {
        warnings.push(
            "No token configured; requests are anonymous. Set SONAR_TOKEN or pass --token."
                .to_string(),
        );
    }

    warnings
}
