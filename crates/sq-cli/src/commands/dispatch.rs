use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Loc(args) => commands::loc::handle(&args, ctx, flags).await,
        Commands::Issues { action } => commands::issues::handle(&action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Housekeeper(args) => commands::housekeeper::handle(&args, ctx, flags).await,
        Commands::Projects { action } => commands::projects::handle(&action, ctx).await,
        Commands::Task { action } => commands::task::handle(&action, ctx).await,
    }
}
