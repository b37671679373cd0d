use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::dates;

/// A quality profile from `qualityprofiles/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QualityProfile {
    pub key: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub language_name: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_built_in: bool,
    #[serde(default)]
    pub is_inherited: bool,
    #[serde(default)]
    pub active_rule_count: u64,
    #[serde(default)]
    pub active_deprecated_rule_count: u64,
    #[serde(default)]
    pub project_count: u64,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub rules_updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub last_used: Option<DateTime<Utc>>,
}

impl QualityProfile {
    /// A profile is in use if it is the language default or has projects.
    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.is_default || self.project_count > 0
    }
}

impl Keyed for QualityProfile {
    fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "key": "AU-Tpxb--iU5OvuD2FLy",
        "name": "Sonar way",
        "language": "java",
        "languageName": "Java",
        "isInherited": false,
        "isDefault": true,
        "isBuiltIn": true,
        "activeRuleCount": 512,
        "activeDeprecatedRuleCount": 3,
        "rulesUpdatedAt": "2024-01-05T12:00:00+0000",
        "lastUsed": "2024-03-01T08:00:00+0000"
    }"#;

    #[test]
    fn deserializes_profile() {
        let profile: QualityProfile = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(profile.language, "java");
        assert_eq!(profile.active_rule_count, 512);
        assert_eq!(profile.active_deprecated_rule_count, 3);
        assert_eq!(profile.project_count, 0);
        assert!(profile.is_used());
    }
}
