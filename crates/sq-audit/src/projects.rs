//! Staleness of projects, branches and pull requests.

use chrono::{DateTime, Utc};
use sq_core::dates::age_in_days;
use sq_core::entities::{Branch, Project, PullRequest};
use sq_core::{ConcernedObject, Problem};

use crate::rules::RuleId;

fn project_object(project: &Project) -> ConcernedObject {
    ConcernedObject::Project {
        key: project.key.clone(),
        name: project.name.clone(),
    }
}

/// Last analysis older than `max_age` days. Never analyzed projects pass.
#[must_use]
pub fn audit_project(project: &Project, now: DateTime<Utc>, max_age: u32) -> Vec<Problem> {
    let Some(analyzed) = project.last_analysis_date else {
        tracing::debug!(project = %project.key, "never analyzed, staleness not audited");
        return Vec::new();
    };
    let age = age_in_days(now, analyzed);
    if age <= i64::from(max_age) {
        return Vec::new();
    }
    vec![
        RuleId::ProjectLastAnalysis
            .problem(format!(
                "Project '{}' last analysis is {age} days old, it may be deletable",
                project.key
            ))
            .concerning(project_object(project)),
    ]
}

/// An analyzed project reporting zero lines of code.
#[must_use]
pub fn audit_zero_loc(project: &Project, ncloc: Option<u64>) -> Vec<Problem> {
    if project.last_analysis_date.is_none() || ncloc != Some(0) {
        return Vec::new();
    }
    vec![
        RuleId::ProjectZeroLoc
            .problem(format!("Project '{}' has been analyzed but has 0 lines of code", project.key))
            .concerning(project_object(project)),
    ]
}

/// Branch staleness. The main branch and branches kept when inactive are
/// exempt; a kept branch that was never analyzed is reported instead.
#[must_use]
pub fn audit_branch(branch: &Branch, now: DateTime<Utc>, max_age: u32) -> Vec<Problem> {
    let object = ConcernedObject::Branch {
        project: branch.project.clone(),
        name: branch.name.clone(),
    };

    let Some(analyzed) = branch.analysis_date else {
        if branch.excluded_from_purge && !branch.is_main {
            return vec![
                RuleId::BranchNeverAnalyzed
                    .problem(format!(
                        "{} is kept when inactive but was never analyzed",
                        object.describe()
                    ))
                    .concerning(object),
            ];
        }
        return Vec::new();
    };

    if branch.is_main || branch.excluded_from_purge {
        return Vec::new();
    }
    let age = age_in_days(now, analyzed);
    if age <= i64::from(max_age) {
        return Vec::new();
    }
    vec![
        RuleId::BranchLastAnalysis
            .problem(format!(
                "{} last analysis is {age} days old, it may be deletable",
                object.describe()
            ))
            .concerning(object),
    ]
}

/// Pull request staleness. Never analyzed pull requests pass.
#[must_use]
pub fn audit_pull_request(pr: &PullRequest, now: DateTime<Utc>, max_age: u32) -> Vec<Problem> {
    let Some(analyzed) = pr.analysis_date else {
        return Vec::new();
    };
    let age = age_in_days(now, analyzed);
    if age <= i64::from(max_age) {
        return Vec::new();
    }
    let object = ConcernedObject::PullRequest {
        project: pr.project.clone(),
        key: pr.key.clone(),
    };
    vec![
        RuleId::PullRequestLastAnalysis
            .problem(format!(
                "{} last analysis is {age} days old, it may be deletable",
                object.describe()
            ))
            .concerning(object),
    ]
}
