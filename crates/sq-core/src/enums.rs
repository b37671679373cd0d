//! Problem classification, task statuses, and server editions.
//!
//! Enums mirrored from the web API use `SCREAMING_SNAKE_CASE` serialization,
//! matching the wire values (`IN_PROGRESS`, `BAD_PRACTICE`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ProblemType
// ---------------------------------------------------------------------------

/// Domain of an audit problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemType {
    Security,
    Governance,
    Configuration,
    Performance,
    BadPractice,
    Operations,
}

impl ProblemType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Security => "SECURITY",
            Self::Governance => "GOVERNANCE",
            Self::Configuration => "CONFIGURATION",
            Self::Performance => "PERFORMANCE",
            Self::BadPractice => "BAD_PRACTICE",
            Self::Operations => "OPERATIONS",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of an audit problem, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Server-reported status of a background task.
///
/// ```text
/// pending → in_progress → success
///                       → failed
///         → canceled
/// ```
///
/// The client-side timeout is not a server status; see the poller's
/// outcome type in `sq-client`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Success,
    Failed,
    Canceled,
}

impl TaskStatus {
    /// Every status, in the order used for the `status` activity filter.
    pub const ALL: [Self; 5] = [
        Self::Success,
        Self::Pending,
        Self::InProgress,
        Self::Failed,
        Self::Canceled,
    ];

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Canceled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Edition
// ---------------------------------------------------------------------------

/// Commercial edition of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    Community,
    Developer,
    Enterprise,
    Datacenter,
}

impl Edition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::Developer => "developer",
            Self::Enterprise => "enterprise",
            Self::Datacenter => "datacenter",
        }
    }

    /// Branches and pull requests exist from developer edition up.
    #[must_use]
    pub const fn supports_branches(self) -> bool {
        !matches!(self, Self::Community)
    }

    /// Portfolios exist in enterprise and datacenter editions only.
    #[must_use]
    pub const fn supports_portfolios(self) -> bool {
        matches!(self, Self::Enterprise | Self::Datacenter)
    }

    /// Applications exist from developer edition up.
    #[must_use]
    pub const fn supports_applications(self) -> bool {
        !matches!(self, Self::Community)
    }
}

impl FromStr for Edition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "community" => Ok(Self::Community),
            "developer" => Ok(Self::Developer),
            "enterprise" => Ok(Self::Enterprise),
            "datacenter" | "data center" => Ok(Self::Datacenter),
            other => Err(CoreError::Validation(format!("unknown edition '{other}'"))),
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ComponentType
// ---------------------------------------------------------------------------

/// Top-level component kinds whose lines of code can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Project,
    App,
    Portfolio,
}

impl ComponentType {
    /// Singular label used in report headers and JSON keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::App => "app",
            Self::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_wire_values() {
        let status: TaskStatus = serde_json::from_str(r#""IN_PROGRESS""#).unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&TaskStatus::Canceled).unwrap(),
            r#""CANCELED""#
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(TaskStatus::Success.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Canceled.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }

    #[test]
    fn problem_type_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ProblemType::BadPractice).unwrap(),
            r#""BAD_PRACTICE""#
        );
        assert_eq!(ProblemType::BadPractice.to_string(), "BAD_PRACTICE");
    }

    #[test]
    fn severity_orders_most_severe_first() {
        assert!(Severity::Critical < Severity::Low);
    }

    #[test]
    fn edition_capabilities() {
        assert!(!Edition::Community.supports_branches());
        assert!(Edition::Developer.supports_branches());
        assert!(!Edition::Developer.supports_portfolios());
        assert!(Edition::Datacenter.supports_portfolios());
        assert_eq!("Enterprise".parse::<Edition>().unwrap(), Edition::Enterprise);
        assert!("platinum".parse::<Edition>().is_err());
    }
}
