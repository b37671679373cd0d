//! Audit toggles and thresholds.
//!
//! Ages are in days. Exclusion patterns are regular expressions matched
//! against each entry of `sonar.exclusions` / `sonar.global.exclusions`.

use serde::{Deserialize, Serialize};

const fn enabled() -> bool {
    true
}

const fn default_project_max_age() -> u32 {
    180
}

const fn default_branch_max_age() -> u32 {
    30
}

const fn default_pull_request_max_age() -> u32 {
    30
}

const fn default_profile_max_update_age() -> u32 {
    180
}

const fn default_profile_max_unused_age() -> u32 {
    60
}

const fn default_profile_min_rules_ratio() -> f64 {
    0.5
}

const fn default_profiles_max_per_language() -> usize {
    5
}

const fn default_token_max_age() -> u32 {
    90
}

const fn default_token_max_unused_age() -> u32 {
    30
}

const fn default_user_max_login_age() -> u32 {
    180
}

fn default_suspicious_exclusions() -> Vec<String> {
    [
        r"\*\*/[^/]+/\*\*",
        r"\*\*/\*[\.\w]*",
        r"\*\*/\*",
        r"\*\*/\*\.(java|jav|cs|csx|py|php|js|ts|sql|html|css|cpp|c|h|hpp)\*?",
    ]
    .map(String::from)
    .to_vec()
}

fn default_suspicious_exceptions() -> Vec<String> {
    vec![r"\*\*/(__pycache__|libs|lib|vendor|node_modules)/\*\*".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AuditConfig {
    #[serde(default = "enabled")]
    pub projects: bool,
    #[serde(default = "default_project_max_age")]
    pub project_max_last_analysis_age: u32,
    #[serde(default = "enabled")]
    pub branches: bool,
    #[serde(default = "default_branch_max_age")]
    pub branch_max_last_analysis_age: u32,
    #[serde(default = "default_pull_request_max_age")]
    pub pull_request_max_last_analysis_age: u32,

    /// Audit scanner exclusions of each project's last analysis.
    #[serde(default)]
    pub exclusions: bool,
    #[serde(default = "default_suspicious_exclusions")]
    pub suspicious_exclusions: Vec<String>,
    #[serde(default = "default_suspicious_exceptions")]
    pub suspicious_exceptions: Vec<String>,

    #[serde(default = "enabled")]
    pub profiles: bool,
    #[serde(default = "default_profile_max_update_age")]
    pub profile_max_last_update_age: u32,
    #[serde(default = "default_profile_max_unused_age")]
    pub profile_max_unused_age: u32,
    /// Minimum share of a language's rules a profile should activate.
    #[serde(default = "default_profile_min_rules_ratio")]
    pub profile_min_rules_ratio: f64,
    #[serde(default = "default_profiles_max_per_language")]
    pub profiles_max_per_language: usize,

    #[serde(default = "enabled")]
    pub users: bool,
    #[serde(default = "default_user_max_login_age")]
    pub user_max_login_age: u32,
    #[serde(default = "default_token_max_age")]
    pub token_max_age: u32,
    #[serde(default = "default_token_max_unused_age")]
    pub token_max_unused_age: u32,
    /// Logins whose tokens and last login are never audited.
    #[serde(default)]
    pub tokens_never_expire: Vec<String>,

    #[serde(default = "enabled")]
    pub groups: bool,
    #[serde(default = "enabled")]
    pub portfolios: bool,
    #[serde(default = "enabled")]
    pub applications: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            projects: true,
            project_max_last_analysis_age: default_project_max_age(),
            branches: true,
            branch_max_last_analysis_age: default_branch_max_age(),
            pull_request_max_last_analysis_age: default_pull_request_max_age(),
            exclusions: false,
            suspicious_exclusions: default_suspicious_exclusions(),
            suspicious_exceptions: default_suspicious_exceptions(),
            profiles: true,
            profile_max_last_update_age: default_profile_max_update_age(),
            profile_max_unused_age: default_profile_max_unused_age(),
            profile_min_rules_ratio: default_profile_min_rules_ratio(),
            profiles_max_per_language: default_profiles_max_per_language(),
            users: true,
            user_max_login_age: default_user_max_login_age(),
            token_max_age: default_token_max_age(),
            token_max_unused_age: default_token_max_unused_age(),
            tokens_never_expire: Vec::new(),
            groups: true,
            portfolios: true,
            applications: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AuditConfig::default();
        assert!(config.projects);
        assert!(!config.exclusions);
        assert_eq!(config.branch_max_last_analysis_age, 30);
        assert!((config.profile_min_rules_ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.profiles_max_per_language, 5);
        assert_eq!(config.suspicious_exclusions.len(), 4);
        assert_eq!(config.suspicious_exceptions.len(), 1);
    }
}
