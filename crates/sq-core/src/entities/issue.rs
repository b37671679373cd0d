use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::dates;

/// An issue from `issues/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,
    pub rule: String,
    pub component: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub pull_request: Option<String>,
    #[serde(default)]
    pub line: Option<u64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(rename = "type", default)]
    pub issue_type: Option<String>,
    pub status: String,
    #[serde(default)]
    pub resolution: Option<String>,
    /// Remediation effort; `debt` on servers before 7.x.
    #[serde(default, alias = "debt")]
    pub effort: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub update_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub close_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Issue {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == "CLOSED"
    }

    /// Same rule, component, message and effort: the issue was very likely
    /// re-created from `other` after a re-analysis.
    #[must_use]
    pub fn is_sibling_of(&self, other: &Self) -> bool {
        self.rule == other.rule
            && self.component == other.component
            && self.message == other.message
            && self.effort == other.effort
    }
}

impl Keyed for Issue {
    fn key(&self) -> &str {
        &self.key
    }
}

/// A comment attached to an issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub key: String,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub markdown: String,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One entry of `issues/changelog`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntry {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub diffs: Vec<FieldDiff>,
}

/// A single field change within a changelog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiff {
    pub key: String,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
}

/// A manual change that can be replayed onto another issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueAction {
    SetSeverity(String),
    SetType(String),
    /// `issues/do_transition` with `falsepositive`, `wontfix` or `reopen`.
    Transition(&'static str),
    Assign(String),
    SetTags(Vec<String>),
    AddComment(String),
}

impl IssueAction {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::SetSeverity(severity) => format!("change severity to {severity}"),
            Self::SetType(issue_type) => format!("change type to {issue_type}"),
            Self::Transition(transition) => format!("apply transition {transition}"),
            Self::Assign(login) => format!("assign to {login}"),
            Self::SetTags(tags) => format!("set tags to {}", tags.join(",")),
            Self::AddComment(_) => "add comment".to_string(),
        }
    }
}

impl ChangelogEntry {
    fn diff(&self, key: &str) -> Option<&FieldDiff> {
        self.diffs.iter().find(|diff| diff.key == key)
    }

    fn new_value(&self, key: &str) -> Option<&str> {
        self.diff(key).and_then(|diff| diff.new_value.as_deref())
    }

    fn first_key(&self) -> Option<&str> {
        self.diffs.first().map(|diff| diff.key.as_str())
    }

    fn is_resolved_as(&self, resolution: &str) -> bool {
        self.new_value("resolution") == Some(resolution)
            && self.new_value("status") == Some("RESOLVED")
    }

    /// An issue resolved as `resolution` and then closed by the server when
    /// the code disappeared.
    fn is_closed_after(&self, resolution: &str) -> bool {
        let fixed = self.diff("resolution").is_some_and(|diff| {
            diff.new_value.as_deref() == Some("FIXED") && diff.old_value.as_deref() == Some(resolution)
        });
        let closed = self.diff("status").is_some_and(|diff| {
            diff.new_value.as_deref() == Some("CLOSED") && diff.old_value.as_deref() == Some("RESOLVED")
        });
        fixed && closed
    }

    /// Whether this entry records a manual decision worth recovering.
    #[must_use]
    pub fn is_manual_change(&self) -> bool {
        self.is_closed_after("FALSE-POSITIVE")
            || self.is_closed_after("WONTFIX")
            || matches!(self.first_key(), Some("severity" | "type"))
    }

    /// The action that reproduces this entry, if it is replayable.
    #[must_use]
    pub fn replay_action(&self) -> Option<IssueAction> {
        match self.first_key()? {
            "severity" => {
                return self
                    .new_value("severity")
                    .map(|value| IssueAction::SetSeverity(value.to_string()));
            }
            "type" => {
                return self
                    .new_value("type")
                    .map(|value| IssueAction::SetType(value.to_string()));
            }
            _ => {}
        }
        if self.diff("resolution").is_some() && self.new_value("status") == Some("REOPENED") {
            return Some(IssueAction::Transition("reopen"));
        }
        if self.is_resolved_as("FALSE-POSITIVE") {
            return Some(IssueAction::Transition("falsepositive"));
        }
        if self.is_resolved_as("WONTFIX") {
            return Some(IssueAction::Transition("wontfix"));
        }
        if let Some(assignee) = self.new_value("assignee") {
            return Some(IssueAction::Assign(assignee.to_string()));
        }
        if self.first_key() == Some("tags") {
            let tags = self
                .new_value("tags")
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect();
            return Some(IssueAction::SetTags(tags));
        }
        None
    }
}
