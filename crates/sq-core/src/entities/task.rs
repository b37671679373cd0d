use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::dates;
use crate::enums::TaskStatus;
use crate::lazy::Lazy;

/// A background task from `ce/activity` or `ce/task`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub component_key: Option<String>,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub execution_time_ms: Option<u64>,
    #[serde(default)]
    pub submitter_login: Option<String>,
    #[serde(default)]
    pub has_scanner_context: bool,
    #[serde(default)]
    pub warning_count: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Scanner context and stack trace, fetched on demand.
    #[serde(skip)]
    pub details: Lazy<TaskDetails>,
}

/// Extra fields only returned by `ce/task` with `additionalFields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    #[serde(default)]
    pub scanner_context: Option<String>,
    #[serde(default)]
    pub error_stacktrace: Option<String>,
}

impl TaskDetails {
    /// `key=value` scanner properties, in context order.
    ///
    /// Properties are listed one per line as `  - sonar.key=value`; lines
    /// not starting with `sonar` are skipped.
    #[must_use]
    pub fn scanner_properties(&self) -> Vec<(&str, &str)> {
        let Some(context) = self.scanner_context.as_deref() else {
            return Vec::new();
        };
        context
            .lines()
            .map(|line| line.trim_start().trim_start_matches("- "))
            .filter(|line| line.starts_with("sonar"))
            .filter_map(|line| line.split_once('='))
            .collect()
    }
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FIXTURE: &str = r#"{
        "id": "AVAn5RKqYwETbXvgas-I",
        "type": "REPORT",
        "componentKey": "project_1",
        "status": "IN_PROGRESS",
        "submittedAt": "2024-03-01T10:00:00+0000",
        "hasScannerContext": true,
        "warningCount": 0
    }"#;

    #[test]
    fn deserializes_task() {
        let task: Task = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(task.task_type, "REPORT");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.has_scanner_context);
        assert!(!task.details.is_loaded());
    }

    #[test]
    fn parses_scanner_properties() {
        let details = TaskDetails {
            scanner_context: Some(
                "SonarQube plugins:\n  - Java 7.16\nProject server settings:\n  - sonar.exclusions=**/*.java, **/gen/**\n  - sonar.projectKey=p\n".into(),
            ),
            error_stacktrace: None,
        };
        assert_eq!(
            details.scanner_properties(),
            vec![
                ("sonar.exclusions", "**/*.java, **/gen/**"),
                ("sonar.projectKey", "p")
            ]
        );
    }
}
