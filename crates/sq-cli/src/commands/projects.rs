//! `sqt projects import`: recreate projects from a project export list.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use sq_client::{ClientError, PollSchedule};

use crate::cli::subcommands::ProjectsCommands;
use crate::context::AppContext;

/// Handle `sqt projects`.
pub async fn handle(action: &ProjectsCommands, ctx: &AppContext) -> anyhow::Result<()> {
    match action {
        ProjectsCommands::Import {
            input,
            no_wait,
            timeout,
        } => import(input, *no_wait, Duration::from_secs(*timeout), ctx).await,
    }
}

/// Keys of the exported projects: every `key,status,zip` line whose status
/// is not `FAIL`.
fn read_keys(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut keys = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("failed to read {}", path.display()))?;
        let Some(key) = record.get(0).filter(|key| !key.is_empty()) else {
            continue;
        };
        if record.get(1) == Some("FAIL") {
            tracing::debug!(project = key, "export failed, skipped");
            continue;
        }
        keys.push(key.to_string());
    }
    Ok(keys)
}

/// Short label of a failed request for the summary.
fn error_label(error: &ClientError) -> String {
    match error {
        ClientError::Api { status, .. } => status.to_string(),
        ClientError::Unauthorized { .. } => "UNAUTHORIZED".into(),
        ClientError::NotFound(_) => "NOT_FOUND".into(),
        ClientError::UnsupportedOperation(_) => "UNSUPPORTED".into(),
        _ => "ERROR".into(),
    }
}

async fn import(path: &Path, no_wait: bool, timeout: Duration, ctx: &AppContext) -> anyhow::Result<()> {
    let keys = read_keys(path)?;
    let total = keys.len();
    tracing::info!(total, "importing projects");

    let mut summary: BTreeMap<String, usize> = BTreeMap::new();
    for (i, key) in keys.iter().enumerate() {
        let outcome = import_one(key, no_wait, timeout, ctx).await;
        *summary.entry(outcome).or_default() += 1;
        tracing::info!("{}/{total} projects imported, {summary:?}", i + 1);
    }
    tracing::info!(?summary, "project import done");
    Ok(())
}

async fn import_one(key: &str, no_wait: bool, timeout: Duration, ctx: &AppContext) -> String {
    let client = &ctx.client;
    if let Err(e) = client.create_project(key, key).await {
        tracing::warn!(project = key, error = %e, "failed to create project");
        return format!("CREATE {}", error_label(&e));
    }

    let task_id = match client.import_project_dump(key).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(project = key, error = %e, "failed to import project dump");
            return format!("IMPORT {}", error_label(&e));
        }
    };
    if no_wait {
        return "IMPORT SUBMITTED".into();
    }

    let waited = match client.task(&task_id).await {
        Ok(task) => {
            client
                .wait_for_completion(&task, ctx.server.version, PollSchedule::with_timeout(timeout))
                .await
        }
        Err(e) => Err(e),
    };
    match waited {
        Ok(outcome) => format!("IMPORT {outcome}"),
        Err(e) => {
            tracing::warn!(project = key, task = %task_id, error = %e, "failed to follow import task");
            format!("IMPORT {}", error_label(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn skips_failed_exports_and_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha,SUCCESS,/exports/alpha.zip").unwrap();
        writeln!(file, "beta, FAIL").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "gamma,SUCCESS,/exports/gamma.zip").unwrap();

        assert_eq!(
            read_keys(file.path()).unwrap(),
            vec!["alpha".to_string(), "gamma".to_string()]
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_keys(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn error_labels() {
        assert_eq!(error_label(&ClientError::NotFound("x".into())), "NOT_FOUND");
    }
}
