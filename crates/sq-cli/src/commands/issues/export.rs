use anyhow::Context;
use sq_client::issues::IssueFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::IssueExportArgs;
use crate::context::AppContext;
use crate::output::{self, issues::IssueRow};
use crate::progress::Progress;

fn filter(args: &IssueExportArgs) -> IssueFilter {
    IssueFilter {
        projects: Vec::new(),
        branch: args.branch.clone(),
        pull_request: args.pull_request.clone(),
        statuses: args.statuses.clone(),
        resolutions: args.resolutions.clone(),
        severities: args.severities.clone(),
        types: args.types.clone(),
        tags: args.tags.clone(),
        directories: Vec::new(),
        created_after: args.created_after,
        created_before: args.created_before,
    }
}

pub async fn run(args: &IssueExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let keys: Vec<String> = if args.keys.is_empty() {
        ctx.client
            .projects(&[])
            .await
            .context("failed to list projects")?
            .keys()
            .map(str::to_string)
            .collect()
    } else {
        args.keys.clone()
    };

    let spinner = Progress::spinner("exporting issues");
    let rows = collect(&keys, &filter(args), args.with_url, ctx, &spinner).await;
    spinner.finish_clear();
    let rows = rows?;
    tracing::info!(projects = keys.len(), issues = rows.len(), "issues exported");

    let out = output::open(flags.file.as_deref())?;
    output::issues::write(
        out,
        flags.output_format(),
        &rows,
        ctx.config.general.csv_separator,
        args.with_url,
    )
}

async fn collect(
    keys: &[String],
    filter: &IssueFilter,
    with_url: bool,
    ctx: &AppContext,
    spinner: &Progress,
) -> anyhow::Result<Vec<IssueRow>> {
    let mut rows = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        spinner.set_message(&format!("exporting issues of {key} ({}/{})", i + 1, keys.len()));
        let issues = ctx
            .client
            .export_issues(&filter.for_project(key))
            .await
            .with_context(|| format!("failed to export issues of project '{key}'"))?;
        tracing::debug!(project = %key, issues = issues.len(), "project issues exported");
        rows.extend(issues.into_iter().map(|issue| {
            let url = with_url.then(|| {
                let project = issue.project.as_deref().unwrap_or(key);
                ctx.client.issue_url(project, &issue.key)
            });
            IssueRow { issue, url }
        }));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn filter_from_arguments() {
        let args = IssueExportArgs {
            keys: vec!["p".into()],
            branch: Some("develop".into()),
            pull_request: None,
            statuses: vec!["OPEN".into()],
            resolutions: Vec::new(),
            severities: Vec::new(),
            types: vec!["BUG".into()],
            tags: Vec::new(),
            created_after: NaiveDate::from_ymd_opt(2024, 1, 1),
            created_before: None,
            with_url: false,
        };
        let filter = filter(&args).for_project("p");
        assert_eq!(filter.projects, vec!["p".to_string()]);
        assert_eq!(filter.branch.as_deref(), Some("develop"));
        assert_eq!(filter.types, vec!["BUG".to_string()]);
        assert_eq!(filter.created_after, NaiveDate::from_ymd_opt(2024, 1, 1));
    }
}
