use std::time::Duration;

use sq_client::{PollSchedule, TaskOutcome};

use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;
use crate::exit_codes::{self, CliError};

/// Handle `sqt task`.
pub async fn handle(action: &TaskCommands, ctx: &AppContext) -> anyhow::Result<()> {
    match action {
        TaskCommands::Wait { id, timeout } => wait(id, Duration::from_secs(*timeout), ctx).await,
    }
}

/// Wait for the task and print its outcome on stdout. Any outcome but
/// success is a general error.
async fn wait(id: &str, timeout: Duration, ctx: &AppContext) -> anyhow::Result<()> {
    let task = ctx.client.task(id).await?;
    let outcome = ctx
        .client
        .wait_for_completion(&task, ctx.server.version, PollSchedule::with_timeout(timeout))
        .await?;
    println!("{outcome}");

    match outcome {
        TaskOutcome::Success => Ok(()),
        TaskOutcome::Timeout { last_status } => Err(CliError::new(
            exit_codes::GENERAL,
            format!("task {id} still {last_status} after {}s", timeout.as_secs()),
        )
        .into()),
        TaskOutcome::Failed | TaskOutcome::Canceled => {
            Err(CliError::new(exit_codes::GENERAL, format!("task {id} {outcome}")).into())
        }
    }
}
