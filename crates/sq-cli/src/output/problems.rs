//! Audit problem report.

use std::io::Write;

use sq_core::Problem;

use crate::cli::OutputFormat;

/// One `severity,type,message` line per problem.
pub fn write_csv<W: Write>(
    out: W,
    problems: &[Problem],
    separator: char,
    with_header: bool,
) -> anyhow::Result<()> {
    let mut writer = super::csv_writer(out, separator)?;
    if with_header {
        writer.write_record(["# severity", "type", "message"])?;
    }
    for problem in problems {
        writer.write_record([
            problem.severity.as_str(),
            problem.problem_type.as_str(),
            problem.message.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// A JSON array of `{rule, type, severity, message, object}`.
pub fn write_json<W: Write>(mut out: W, problems: &[Problem]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, problems)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn write<W: Write>(
    out: W,
    format: OutputFormat,
    problems: &[Problem],
    separator: char,
    with_header: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => write_csv(out, problems, separator, with_header),
        OutputFormat::Json => write_json(out, problems),
    }
}
