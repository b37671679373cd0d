use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::dates;

/// A project branch from `project_branches/list`.
///
/// Keyed by branch name; unique within its project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Owning project key, set by the client.
    #[serde(default)]
    pub project: String,
    pub name: String,
    #[serde(default)]
    pub is_main: bool,
    /// `true` when the branch is kept even if inactive.
    #[serde(default)]
    pub excluded_from_purge: bool,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub analysis_date: Option<DateTime<Utc>>,
}

impl Keyed for Branch {
    fn key(&self) -> &str {
        &self.name
    }
}

/// A pull request from `project_pull_requests/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    #[serde(default)]
    pub project: String,
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub analysis_date: Option<DateTime<Utc>>,
}

impl Keyed for PullRequest {
    fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "branches": [
            {"name": "main", "isMain": true, "type": "BRANCH",
             "analysisDate": "2024-03-01T10:00:00+0000", "excludedFromPurge": true},
            {"name": "feature/x", "isMain": false, "type": "BRANCH",
             "excludedFromPurge": false}
        ]
    }"#;

    #[derive(Deserialize)]
    struct Listing {
        branches: Vec<Branch>,
    }

    #[test]
    fn deserializes_branch_list() {
        let listing: Listing = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(listing.branches.len(), 2);
        assert!(listing.branches[0].is_main);
        assert!(listing.branches[0].excluded_from_purge);
        assert!(listing.branches[1].analysis_date.is_none());
        assert!(listing.branches[1].project.is_empty());
    }
}
