use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::dates;
use crate::lazy::Lazy;

/// A project as returned by `projects/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub qualifier: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    /// `analysisDate` in `components/show` responses.
    #[serde(
        default,
        alias = "analysisDate",
        deserialize_with = "dates::deserialize_opt"
    )]
    pub last_analysis_date: Option<DateTime<Utc>>,
}

impl Keyed for Project {
    fn key(&self) -> &str {
        &self.key
    }
}

/// An application (qualifier `APP`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub key: String,
    pub name: String,
    /// Number of aggregated projects, loaded with the `projects` measure.
    #[serde(skip)]
    pub nbr_projects: Lazy<u64>,
}

impl Keyed for Application {
    fn key(&self) -> &str {
        &self.key
    }
}

/// A portfolio or sub-portfolio (qualifier `VW` or `SVW`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub qualifier: Option<String>,
    /// Number of aggregated projects, loaded with the `projects` measure.
    #[serde(skip)]
    pub nbr_projects: Lazy<u64>,
}

impl Portfolio {
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.qualifier.as_deref() == Some("VW")
    }
}

impl Keyed for Portfolio {
    fn key(&self) -> &str {
        &self.key
    }
}
