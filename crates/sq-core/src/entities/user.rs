use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::dates;

/// A user from `users/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub tokens_count: Option<u64>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub last_connection_date: Option<DateTime<Utc>>,
}

const fn default_true() -> bool {
    true
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.login
    }
}

/// A user token from `user_tokens/search`.
///
/// The API returns the login once for the whole list; the client copies it
/// into each token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserToken {
    #[serde(default)]
    pub login: String,
    pub name: String,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub last_connection_date: Option<DateTime<Utc>>,
}

impl Keyed for UserToken {
    fn key(&self) -> &str {
        &self.name
    }
}

/// A group from `user_groups/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members_count: Option<u64>,
    /// The built-in group every user belongs to.
    #[serde(default)]
    pub default: bool,
}

impl Keyed for Group {
    fn key(&self) -> &str {
        &self.name
    }
}
