use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `sqt` binary.
#[derive(Debug, Parser)]
#[command(name = "sqt", version, about = "Command-line tools for SonarQube")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server URL (defaults to SONAR_HOST_URL or configuration)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// User token (defaults to SONAR_TOKEN or configuration)
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// Report format: csv, json (defaults from the output file extension)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            url: self.url.clone(),
            token: self.token.clone(),
            format: self.format,
            file: self.file.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::root_commands::{HousekeeperMode, LocComponent};
    use crate::cli::subcommands::{IssuesCommands, ProjectsCommands, TaskCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "sqt",
            "--url",
            "https://sonar.example.com",
            "--format",
            "json",
            "--verbose",
            "loc",
        ])
        .expect("cli should parse");

        assert_eq!(cli.url.as_deref(), Some("https://sonar.example.com"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Loc(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["sqt", "audit", "-t", "squ_x", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.token.as_deref(), Some("squ_x"));
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Audit(_)));
    }

    #[test]
    fn format_follows_file_extension() {
        let cli = Cli::try_parse_from(["sqt", "loc", "-f", "out.JSON"]).expect("cli should parse");
        assert_eq!(cli.global_flags().output_format(), OutputFormat::Json);

        let cli = Cli::try_parse_from(["sqt", "loc", "-f", "out.json", "--format", "csv"])
            .expect("cli should parse");
        assert_eq!(cli.global_flags().output_format(), OutputFormat::Csv);

        let cli = Cli::try_parse_from(["sqt", "loc"]).expect("cli should parse");
        assert_eq!(cli.global_flags().output_format(), OutputFormat::Csv);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["sqt", "--format", "xml", "loc"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn loc_arguments() {
        let cli = Cli::try_parse_from([
            "sqt",
            "loc",
            "--component-type",
            "portfolios",
            "--top-level-only",
            "-k",
            "a,b",
            "-n",
            "-a",
        ])
        .expect("cli should parse");
        let Commands::Loc(args) = cli.command else {
            panic!("expected loc");
        };
        assert_eq!(args.component_type, LocComponent::Portfolios);
        assert!(args.top_level_only);
        assert_eq!(args.keys, vec!["a".to_string(), "b".to_string()]);
        assert!(args.with_name && args.with_last_analysis);
    }

    #[test]
    fn housekeeper_short_flags() {
        let cli = Cli::try_parse_from([
            "sqt",
            "housekeeper",
            "-P",
            "400",
            "-B",
            "60",
            "-R",
            "15",
            "-T",
            "180",
            "--mode",
            "delete",
        ])
        .expect("cli should parse");
        let Commands::Housekeeper(args) = cli.command else {
            panic!("expected housekeeper");
        };
        assert_eq!(args.projects_max_age, Some(400));
        assert_eq!(args.branches_max_age, Some(60));
        assert_eq!(args.pull_requests_max_age, Some(15));
        assert_eq!(args.tokens_max_age, Some(180));
        assert_eq!(args.mode, HousekeeperMode::Delete);
    }

    #[test]
    fn nested_subcommands() {
        let cli = Cli::try_parse_from(["sqt", "issues", "recover", "-k", "p", "--dry-run"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Issues {
                action: IssuesCommands::Recover { dry_run: true, .. }
            }
        ));

        let cli = Cli::try_parse_from(["sqt", "projects", "import", "-i", "list.csv", "--no-wait"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Projects {
                action: ProjectsCommands::Import { no_wait: true, .. }
            }
        ));

        let cli = Cli::try_parse_from(["sqt", "task", "wait", "AVAn5RKq", "--timeout", "30"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Task {
                action: TaskCommands::Wait { timeout: 30, .. }
            }
        ));
    }

    #[test]
    fn audit_scopes_are_validated() {
        assert!(Cli::try_parse_from(["sqt", "audit", "--what", "projects,users"]).is_ok());
        assert!(Cli::try_parse_from(["sqt", "audit", "--what", "webhooks"]).is_err());
    }
}
