//! `sqt housekeeper`: find obsolete projects, branches, pull requests and
//! tokens, and delete them in `--mode delete`.

use sq_audit::{Auditor, RuleId};
use sq_client::SonarClient;
use sq_config::{AuditConfig, HousekeeperConfig, MIN_PROJECTS_MAX_AGE};
use sq_core::{ConcernedObject, Problem};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{HousekeeperArgs, HousekeeperMode};
use crate::context::AppContext;
use crate::output;

/// Age limits in days, flags first, then configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Thresholds {
    projects: u32,
    branches: u32,
    pull_requests: u32,
    tokens: u32,
    tokens_unused: u32,
}

impl Thresholds {
    fn resolve(args: &HousekeeperArgs, config: &HousekeeperConfig) -> Self {
        Self {
            projects: args.projects_max_age.unwrap_or(config.projects_max_age),
            branches: args.branches_max_age.unwrap_or(config.branches_max_age),
            pull_requests: args
                .pull_requests_max_age
                .unwrap_or(config.pull_requests_max_age),
            tokens: args.tokens_max_age.unwrap_or(config.tokens_max_age),
            tokens_unused: config.tokens_max_unused_age,
        }
    }

    fn audit_config(self, base: &AuditConfig) -> AuditConfig {
        AuditConfig {
            projects: true,
            project_max_last_analysis_age: self.projects,
            branches: true,
            branch_max_last_analysis_age: self.branches,
            pull_request_max_last_analysis_age: self.pull_requests,
            exclusions: false,
            users: true,
            token_max_age: self.tokens,
            token_max_unused_age: self.tokens_unused,
            groups: true,
            ..base.clone()
        }
    }
}

/// Objects to delete or revoke.
#[derive(Debug, Default, PartialEq, Eq)]
struct Cleanup {
    projects: Vec<String>,
    /// `(project, branch)`
    branches: Vec<(String, String)>,
    /// `(project, pull request)`
    pull_requests: Vec<(String, String)>,
    /// `(login, token name)`
    tokens: Vec<(String, String)>,
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

impl Cleanup {
    fn from_problems(problems: &[Problem]) -> Self {
        let mut plan = Self::default();
        for problem in problems {
            let rule = problem.rule.as_str();
            match &problem.concerned {
                Some(ConcernedObject::Project { key, .. })
                    if rule == RuleId::ProjectLastAnalysis.as_str() =>
                {
                    push_unique(&mut plan.projects, key.clone());
                }
                Some(ConcernedObject::Branch { project, name })
                    if rule == RuleId::BranchLastAnalysis.as_str() =>
                {
                    push_unique(&mut plan.branches, (project.clone(), name.clone()));
                }
                Some(ConcernedObject::PullRequest { project, key })
                    if rule == RuleId::PullRequestLastAnalysis.as_str() =>
                {
                    push_unique(&mut plan.pull_requests, (project.clone(), key.clone()));
                }
                Some(ConcernedObject::UserToken { login, name })
                    if [RuleId::TokenTooOld, RuleId::TokenUnused, RuleId::TokenNeverUsed]
                        .iter()
                        .any(|id| id.as_str() == rule) =>
                {
                    push_unique(&mut plan.tokens, (login.clone(), name.clone()));
                }
                _ => {}
            }
        }

        // Branches and pull requests go away with their project.
        let projects = &plan.projects;
        plan.branches.retain(|(project, branch)| {
            let keep = !projects.contains(project);
            if !keep {
                tracing::info!(%project, %branch, "project deleted, so no need to delete branch");
            }
            keep
        });
        plan.pull_requests.retain(|(project, pr)| {
            let keep = !projects.contains(project);
            if !keep {
                tracing::info!(%project, pull_request = %pr, "project deleted, so no need to delete pull request");
            }
            keep
        });
        plan
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Totals {
    projects: usize,
    loc: u64,
    branches: usize,
    pull_requests: usize,
    tokens: usize,
}

/// Handle `sqt housekeeper`.
pub async fn handle(
    args: &HousekeeperArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let thresholds = Thresholds::resolve(args, &ctx.config.housekeeper);
    let audit_config = thresholds.audit_config(&ctx.config.audit);
    let auditor = Auditor::new(&ctx.client, ctx.server, &audit_config)?;

    let mut problems = Vec::new();
    if thresholds.projects < MIN_PROJECTS_MAX_AGE {
        tracing::error!(
            max_age = thresholds.projects,
            minimum = MIN_PROJECTS_MAX_AGE,
            "as a safety measure, projects more recent than the minimum age are never deleted, projects not audited"
        );
    } else {
        problems.extend(auditor.audit_projects(&[]).await?);
    }
    problems.extend(auditor.audit_tokens().await?);

    let groups = auditor.audit_groups().await?;
    if !groups.is_empty() {
        tracing::warn!(count = groups.len(), "empty groups found during audit");
    }
    problems.extend(groups);

    let out = output::open(flags.file.as_deref())?;
    output::problems::write(
        out,
        flags.output_format(),
        &problems,
        ctx.config.general.csv_separator,
        true,
    )?;

    let plan = Cleanup::from_problems(&problems);
    let totals = execute(&ctx.client, &plan, args.mode).await;

    let op = match args.mode {
        HousekeeperMode::Delete => "deleted",
        HousekeeperMode::DryRun => "to delete",
    };
    tracing::info!(
        "{} projects older than {} days ({} LoCs) {op}",
        totals.projects,
        thresholds.projects,
        totals.loc
    );
    tracing::info!("{} branches older than {} days {op}", totals.branches, thresholds.branches);
    tracing::info!(
        "{} pull requests older than {} days {op}",
        totals.pull_requests,
        thresholds.pull_requests
    );
    let op = match args.mode {
        HousekeeperMode::Delete => "revoked",
        HousekeeperMode::DryRun => "to revoke",
    };
    tracing::info!("{} tokens older than {} days {op}", totals.tokens, thresholds.tokens);
    Ok(())
}

/// Count, and in delete mode apply, the cleanup. A failed deletion is
/// logged and not counted.
async fn execute(client: &SonarClient, plan: &Cleanup, mode: HousekeeperMode) -> Totals {
    let delete = mode == HousekeeperMode::Delete;
    let mut totals = Totals::default();

    for key in &plan.projects {
        let loc = match client.ncloc(key, None).await {
            Ok(loc) => loc.unwrap_or(0),
            Err(e) => {
                tracing::warn!(project = %key, error = %e, "LoC unavailable");
                0
            }
        };
        tracing::info!(project = %key, loc, delete, "obsolete project");
        if delete && let Err(e) = client.delete_project(key).await {
            tracing::warn!(project = %key, error = %e, "failed to delete project");
            continue;
        }
        totals.projects += 1;
        totals.loc += loc;
    }

    for (project, branch) in &plan.branches {
        if delete && let Err(e) = client.delete_branch(project, branch).await {
            tracing::warn!(%project, %branch, error = %e, "failed to delete branch");
            continue;
        }
        totals.branches += 1;
    }

    for (project, pr) in &plan.pull_requests {
        if delete && let Err(e) = client.delete_pull_request(project, pr).await {
            tracing::warn!(%project, pull_request = %pr, error = %e, "failed to delete pull request");
            continue;
        }
        totals.pull_requests += 1;
    }

    for (login, name) in &plan.tokens {
        if delete && let Err(e) = client.revoke_token(login, name).await {
            tracing::warn!(%login, token = %name, error = %e, "failed to revoke token");
            continue;
        }
        totals.tokens += 1;
    }

    totals
}
