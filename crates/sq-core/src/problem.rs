//! Audit problems and the objects they concern.

use serde::{Deserialize, Serialize};

use crate::enums::{ProblemType, Severity};

/// The object an audit problem is about.
///
/// Each variant carries what is needed to report the object and, for
/// the housekeeper, to delete or revoke it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConcernedObject {
    Project { key: String, name: String },
    Branch { project: String, name: String },
    PullRequest { project: String, key: String },
    Application { key: String, name: String },
    Portfolio { key: String, name: String },
    QualityProfile {
        key: String,
        name: String,
        language: String,
    },
    UserToken { login: String, name: String },
    User { login: String },
    Group { name: String },
    Task { id: String },
    AppNode { name: String },
}

impl ConcernedObject {
    /// Short human-readable reference, e.g. `project 'my-app'`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Project { key, .. } => format!("project '{key}'"),
            Self::Branch { project, name } => format!("branch '{name}' of project '{project}'"),
            Self::PullRequest { project, key } => {
                format!("pull request '{key}' of project '{project}'")
            }
            Self::Application { key, .. } => format!("application '{key}'"),
            Self::Portfolio { key, .. } => format!("portfolio '{key}'"),
            Self::QualityProfile { name, language, .. } => {
                format!("quality profile '{name}' of language '{language}'")
            }
            Self::UserToken { login, name } => format!("token '{name}' of user '{login}'"),
            Self::User { login } => format!("user '{login}'"),
            Self::Group { name } => format!("group '{name}'"),
            Self::Task { id } => format!("background task '{id}'"),
            Self::AppNode { name } => format!("application node '{name}'"),
        }
    }
}

/// One audit finding. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub rule: String,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub severity: Severity,
    pub message: String,
    #[serde(rename = "object", default, skip_serializing_if = "Option::is_none")]
    pub concerned: Option<ConcernedObject>,
}

impl Problem {
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        problem_type: ProblemType,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            problem_type,
            severity,
            message: message.into(),
            concerned: None,
        }
    }

    #[must_use]
    pub fn concerning(mut self, object: ConcernedObject) -> Self {
        self.concerned = Some(object);
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_tagged_object() {
        let problem = Problem::new(
            "EMPTY_GROUP",
            ProblemType::Governance,
            Severity::Low,
            "Group 'devs' is empty",
        )
        .concerning(ConcernedObject::Group {
            name: "devs".into(),
        });

        assert_eq!(
            serde_json::to_value(&problem).unwrap(),
            json!({
                "rule": "EMPTY_GROUP",
                "type": "GOVERNANCE",
                "severity": "LOW",
                "message": "Group 'devs' is empty",
                "object": {"kind": "group", "name": "devs"}
            })
        );
    }

    #[test]
    fn object_is_optional() {
        let problem = Problem::new(
            "NOT_HA",
            ProblemType::Performance,
            Severity::High,
            "single node",
        );
        let value = serde_json::to_value(&problem).unwrap();
        assert!(value.get("object").is_none());
    }

    #[test]
    fn describes_branch() {
        let object = ConcernedObject::Branch {
            project: "p".into(),
            name: "feature".into(),
        };
        assert_eq!(object.describe(), "branch 'feature' of project 'p'");
    }
}
