use std::path::PathBuf;

use clap::Subcommand;

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectsCommands {
    /// Create projects and import their dumps from a `key,status,zip` list.
    Import {
        /// List produced by a project export
        #[arg(short, long)]
        input: PathBuf,
        /// Submit the imports without waiting for their background tasks
        #[arg(long)]
        no_wait: bool,
        /// Seconds to wait on each import task
        #[arg(long, default_value_t = 180)]
        timeout: u64,
    },
}
