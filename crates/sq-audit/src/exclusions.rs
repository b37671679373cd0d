//! Suspicious scanner exclusions.
//!
//! Patterns are compiled once from configuration into an
//! [`ExclusionPatterns`] value and passed to every project audit.

use regex::Regex;
use sq_core::entities::TaskDetails;
use sq_core::{ConcernedObject, Problem};

use crate::error::AuditError;
use crate::rules::RuleId;

const EXCLUSION_PROPERTIES: [&str; 2] = ["sonar.exclusions", "sonar.global.exclusions"];

/// Compiled suspicious-exclusion regexes and their exceptions.
#[derive(Debug, Clone)]
pub struct ExclusionPatterns {
    suspicious: Vec<Regex>,
    exceptions: Vec<Regex>,
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, AuditError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| AuditError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

impl ExclusionPatterns {
    /// # Errors
    ///
    /// Returns [`AuditError::Pattern`] for the first invalid regex.
    pub fn new(suspicious: &[String], exceptions: &[String]) -> Result<Self, AuditError> {
        Ok(Self {
            suspicious: compile(suspicious)?,
            exceptions: compile(exceptions)?,
        })
    }

    /// Whether one exclusion entry (e.g. `**/*.java`) is suspicious.
    #[must_use]
    pub fn is_suspicious(&self, exclusion: &str) -> bool {
        if !self.suspicious.iter().any(|re| re.is_match(exclusion)) {
            return false;
        }
        if self.exceptions.iter().any(|re| re.is_match(exclusion)) {
            tracing::debug!(exclusion, "exclusion matches an exception, not reported");
            return false;
        }
        true
    }

    /// One problem per suspicious entry of the exclusion properties found in
    /// a task's scanner context.
    #[must_use]
    pub fn audit(&self, project: &ConcernedObject, details: &TaskDetails) -> Vec<Problem> {
        details
            .scanner_properties()
            .into_iter()
            .filter(|(property, _)| EXCLUSION_PROPERTIES.contains(property))
            .flat_map(|(_, value)| value.split(','))
            .map(str::trim)
            .filter(|exclusion| !exclusion.is_empty() && self.is_suspicious(exclusion))
            .map(|exclusion| {
                RuleId::ProjectSuspiciousExclusion
                    .problem(format!(
                        "{} has a suspicious exclusion pattern '{exclusion}'",
                        project.describe()
                    ))
                    .concerning(project.clone())
            })
            .collect()
    }
}
