use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Issue commands.
#[derive(Clone, Debug, Subcommand)]
pub enum IssuesCommands {
    /// Export issues, past the server's 10 000 result window.
    Export(IssueExportArgs),
    /// Replay the manual changes of closed issues onto their reopened
    /// siblings.
    Recover {
        /// Project key
        #[arg(short = 'k', long)]
        project: String,
        /// Only log what would be changed
        #[arg(long)]
        dry_run: bool,
    },
}

/// Arguments for `sqt issues export`.
#[derive(Clone, Debug, Args)]
pub struct IssueExportArgs {
    /// Project keys (comma separated); all projects when absent
    #[arg(short = 'k', long, value_delimiter = ',')]
    pub keys: Vec<String>,
    #[arg(short = 'b', long)]
    pub branch: Option<String>,
    #[arg(long)]
    pub pull_request: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub statuses: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub resolutions: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub severities: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Issues created on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub created_after: Option<NaiveDate>,
    /// Issues created before this day (YYYY-MM-DD)
    #[arg(long)]
    pub created_before: Option<NaiveDate>,
    #[arg(long)]
    pub with_url: bool,
}
