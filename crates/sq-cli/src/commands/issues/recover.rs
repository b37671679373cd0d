//! Recover manual changes lost when issues were closed and re-created by a
//! re-analysis.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sq_client::issues::IssueFilter;
use sq_core::entities::{ChangelogEntry, Comment, Issue, IssueAction};

use crate::context::AppContext;

/// Actions reproducing a changelog and its comments, oldest first.
fn replay_plan(changelog: &[ChangelogEntry], comments: &[Comment]) -> Vec<IssueAction> {
    let mut dated: Vec<(Option<DateTime<Utc>>, IssueAction)> = changelog
        .iter()
        .filter_map(|entry| entry.replay_action().map(|action| (entry.creation_date, action)))
        .chain(
            comments
                .iter()
                .map(|comment| (comment.created_at, IssueAction::AddComment(comment.markdown.clone()))),
        )
        .collect();
    dated.sort_by_key(|(date, _)| *date);
    dated.into_iter().map(|(_, action)| action).collect()
}

#[derive(Debug, Default)]
struct Totals {
    candidates: usize,
    recovered: usize,
    ambiguous: usize,
    failed_actions: usize,
}

pub async fn run(project: &str, dry_run: bool, ctx: &AppContext) -> anyhow::Result<()> {
    let client = &ctx.client;
    let issues = client
        .export_issues(&IssueFilter::default().for_project(project))
        .await
        .with_context(|| format!("failed to search issues of project '{project}'"))?;
    let (closed, open): (Vec<Issue>, Vec<Issue>) = issues.into_iter().partition(Issue::is_closed);
    tracing::info!(project, closed = closed.len(), open = open.len(), "issues found");

    let mut totals = Totals::default();
    for old in &closed {
        let changelog = match client.changelog(&old.key).await {
            Ok(changelog) => changelog,
            Err(e) => {
                tracing::warn!(issue = %old.key, error = %e, "failed to read changelog, issue skipped");
                continue;
            }
        };
        if !changelog.iter().any(ChangelogEntry::is_manual_change) {
            continue;
        }
        totals.candidates += 1;

        let mut siblings = Vec::new();
        for candidate in open.iter().filter(|issue| issue.is_sibling_of(old)) {
            match client.changelog(&candidate.key).await {
                Ok(history) if history.is_empty() => siblings.push(candidate),
                Ok(_) => tracing::debug!(issue = %candidate.key, "sibling has its own history"),
                Err(e) => tracing::warn!(issue = %candidate.key, error = %e, "failed to read changelog"),
            }
        }

        let [sibling] = siblings.as_slice() else {
            if siblings.is_empty() {
                tracing::debug!(issue = %old.key, "no sibling found");
            } else {
                totals.ambiguous += 1;
                tracing::warn!(issue = %old.key, siblings = siblings.len(), "ambiguous siblings, changelog not applied");
            }
            continue;
        };

        tracing::info!(closed = %old.key, open = %sibling.key, "recovering changelog");
        for action in replay_plan(&changelog, &old.comments) {
            if dry_run {
                tracing::info!(issue = %sibling.key, "dry run: would {}", action.describe());
                continue;
            }
            if let Err(e) = client.apply_issue_action(&sibling.key, &action).await {
                totals.failed_actions += 1;
                tracing::warn!(issue = %sibling.key, error = %e, "failed to {}", action.describe());
            }
        }
        totals.recovered += 1;
    }

    tracing::info!(
        project,
        dry_run,
        candidates = totals.candidates,
        recovered = totals.recovered,
        ambiguous = totals.ambiguous,
        failed_actions = totals.failed_actions,
        "issue recovery done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const CHANGELOG: &str = r#"[
        {
            "user": "admin",
            "creationDate": "2024-02-01T10:00:00+0000",
            "diffs": [
                {"key": "resolution", "newValue": "FALSE-POSITIVE"},
                {"key": "status", "oldValue": "OPEN", "newValue": "RESOLVED"}
            ]
        },
        {
            "user": "admin",
            "creationDate": "2024-01-15T10:00:00+0000",
            "diffs": [{"key": "severity", "oldValue": "MAJOR", "newValue": "MINOR"}]
        },
        {
            "creationDate": "2024-03-01T10:00:00+0000",
            "diffs": [
                {"key": "resolution", "oldValue": "FALSE-POSITIVE", "newValue": "FIXED"},
                {"key": "status", "oldValue": "RESOLVED", "newValue": "CLOSED"}
            ]
        }
    ]"#;

    const COMMENTS: &str = r#"[
        {"key": "c1", "login": "admin", "markdown": "not reachable", "createdAt": "2024-01-20T08:00:00+0000"}
    ]"#;

    #[test]
    fn plan_is_chronological_and_skips_server_closures() {
        let changelog: Vec<ChangelogEntry> = serde_json::from_str(CHANGELOG).unwrap();
        let comments: Vec<Comment> = serde_json::from_str(COMMENTS).unwrap();
        assert_eq!(
            replay_plan(&changelog, &comments),
            vec![
                IssueAction::SetSeverity("MINOR".into()),
                IssueAction::AddComment("not reachable".into()),
                IssueAction::Transition("falsepositive"),
            ]
        );
    }

    #[test]
    fn plan_without_manual_changes_is_empty() {
        assert!(replay_plan(&[], &[]).is_empty());
    }
}
