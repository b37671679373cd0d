use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use sq_audit::Scope;
use sq_core::enums::ComponentType;

use crate::cli::subcommands::{IssuesCommands, ProjectsCommands, TaskCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Export lines of code of projects, applications or portfolios.
    Loc(LocArgs),
    /// Issue export and changelog recovery.
    Issues {
        #[command(subcommand)]
        action: IssuesCommands,
    },
    /// Audit the server configuration, or a system info file.
    Audit(AuditArgs),
    /// Report, and optionally delete, obsolete projects, branches, pull
    /// requests and tokens.
    Housekeeper(HousekeeperArgs),
    /// Project administration.
    Projects {
        #[command(subcommand)]
        action: ProjectsCommands,
    },
    /// Background tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
}

/// Object family measured by `sqt loc`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LocComponent {
    #[default]
    Projects,
    Apps,
    Portfolios,
}

impl From<LocComponent> for ComponentType {
    fn from(value: LocComponent) -> Self {
        match value {
            LocComponent::Projects => Self::Project,
            LocComponent::Apps => Self::App,
            LocComponent::Portfolios => Self::Portfolio,
        }
    }
}

/// Arguments for `sqt loc`.
#[derive(Clone, Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct LocArgs {
    /// Only these keys (comma separated); all objects when absent
    #[arg(short, long, value_delimiter = ',')]
    pub keys: Vec<String>,
    #[arg(long, value_enum, default_value_t)]
    pub component_type: LocComponent,
    /// One row per branch instead of one per object
    #[arg(short = 'b', long)]
    pub with_branches: bool,
    /// Portfolios only: skip sub-portfolios
    #[arg(long)]
    pub top_level_only: bool,
    #[arg(short = 'n', long)]
    pub with_name: bool,
    #[arg(short = 'a', long)]
    pub with_last_analysis: bool,
    #[arg(long)]
    pub with_url: bool,
}

/// Arguments for `sqt audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Families to audit (comma separated); all when absent
    #[arg(long, value_delimiter = ',')]
    pub what: Vec<Scope>,
    /// Audit this system info file instead of the server
    #[arg(long)]
    pub sif: Option<PathBuf>,
    /// Prepend a header line to the CSV report
    #[arg(long)]
    pub csv_header: bool,
}

/// What the housekeeper does with what it finds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum HousekeeperMode {
    #[default]
    DryRun,
    Delete,
}

/// Arguments for `sqt housekeeper`.
#[derive(Clone, Debug, Args)]
pub struct HousekeeperArgs {
    /// Days since last analysis after which a project is obsolete
    #[arg(short = 'P', long)]
    pub projects_max_age: Option<u32>,
    /// Days since last analysis after which a branch is obsolete
    #[arg(short = 'B', long)]
    pub branches_max_age: Option<u32>,
    /// Days since last analysis after which a pull request is obsolete
    #[arg(short = 'R', long)]
    pub pull_requests_max_age: Option<u32>,
    /// Days after which a token must be revoked
    #[arg(short = 'T', long)]
    pub tokens_max_age: Option<u32>,
    #[arg(long, value_enum, default_value_t)]
    pub mode: HousekeeperMode,
}
