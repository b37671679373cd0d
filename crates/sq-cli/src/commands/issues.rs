mod export;
mod recover;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::IssuesCommands;
use crate::context::AppContext;

/// Handle `sqt issues`.
pub async fn handle(
    action: &IssuesCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        IssuesCommands::Export(args) => export::run(args, ctx, flags).await,
        IssuesCommands::Recover { project, dry_run } => recover::run(project, *dry_run, ctx).await,
    }
}
