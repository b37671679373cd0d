use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod exit_codes;
mod output;
mod progress;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("sqt error: {error:#}");
        std::process::exit(exit_codes::for_error(&error));
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    progress::init(&flags);

    let config = bootstrap::load_config(&flags)?;

    // A SIF is audited offline.
    if let cli::Commands::Audit(args) = &cli.command
        && let Some(sif) = &args.sif
    {
        return commands::audit::handle_sif(sif, args.csv_header, &config, &flags);
    }

    context::warn_unconfigured(&config);
    let ctx = context::AppContext::init(config)
        .await
        .context("failed to connect to the SonarQube server")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SQT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
