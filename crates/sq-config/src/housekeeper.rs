//! Default ages for the housekeeper.

use serde::{Deserialize, Serialize};

const fn default_projects_max_age() -> u32 {
    365
}

const fn default_branches_max_age() -> u32 {
    90
}

const fn default_pull_requests_max_age() -> u32 {
    30
}

const fn default_tokens_max_age() -> u32 {
    365
}

const fn default_tokens_max_unused_age() -> u32 {
    30
}

/// Projects threshold below which the housekeeper refuses to audit projects.
pub const MIN_PROJECTS_MAX_AGE: u32 = 90;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HousekeeperConfig {
    #[serde(default = "default_projects_max_age")]
    pub projects_max_age: u32,
    #[serde(default = "default_branches_max_age")]
    pub branches_max_age: u32,
    #[serde(default = "default_pull_requests_max_age")]
    pub pull_requests_max_age: u32,
    #[serde(default = "default_tokens_max_age")]
    pub tokens_max_age: u32,
    #[serde(default = "default_tokens_max_unused_age")]
    pub tokens_max_unused_age: u32,
}

impl Default for HousekeeperConfig {
    fn default() -> Self {
        Self {
            projects_max_age: default_projects_max_age(),
            branches_max_age: default_branches_max_age(),
            pull_requests_max_age: default_pull_requests_max_age(),
            tokens_max_age: default_tokens_max_age(),
            tokens_max_unused_age: default_tokens_max_unused_age(),
        }
    }
}
