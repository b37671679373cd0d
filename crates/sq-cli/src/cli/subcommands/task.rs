use clap::Subcommand;

/// Background task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Wait for a background task to complete.
    Wait {
        id: String,
        /// Seconds before giving up
        #[arg(long, default_value_t = 180)]
        timeout: u64,
    },
}
