use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sq_audit::{Auditor, Scope};
use sq_config::SonarConfig;
use sq_core::Problem;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::context::AppContext;
use crate::output;

/// Handle `sqt audit` against the connected server.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let scopes: &[Scope] = if args.what.is_empty() {
        &Scope::ALL
    } else {
        &args.what
    };

    let auditor = Auditor::new(&ctx.client, ctx.server, &ctx.config.audit)?;
    let problems = auditor.audit(scopes).await?;
    report(&problems, args.csv_header, &ctx.config, flags)
}

/// Handle `sqt audit --sif <file>`: no server connection is made.
pub fn handle_sif(
    path: &Path,
    csv_header: bool,
    config: &SonarConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let problems = sq_audit::audit_sif_file(path, Utc::now())
        .with_context(|| format!("failed to audit {}", path.display()))?;
    report(&problems, csv_header, config, flags)
}

fn report(
    problems: &[Problem],
    csv_header: bool,
    config: &SonarConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    tracing::info!(problems = problems.len(), "audit completed");
    let out = output::open(flags.file.as_deref())?;
    output::problems::write(
        out,
        flags.output_format(),
        problems,
        config.general.csv_separator,
        csv_header,
    )
}
