//! Issue export rows.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sq_core::entities::Issue;

use crate::cli::OutputFormat;

const HEADER: [&str; 18] = [
    "# key",
    "rule",
    "type",
    "severity",
    "status",
    "resolution",
    "creation date",
    "update date",
    "project",
    "branch",
    "pull request",
    "component",
    "line",
    "message",
    "effort",
    "author",
    "assignee",
    "tags",
];

/// An exported issue with its optional browser URL.
#[derive(Debug, Clone)]
pub struct IssueRow {
    pub issue: Issue,
    pub url: Option<String>,
}

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn csv_record(row: &IssueRow, with_url: bool) -> Vec<String> {
    let issue = &row.issue;
    let mut record = vec![
        issue.key.clone(),
        issue.rule.clone(),
        text(issue.issue_type.as_ref()),
        text(issue.severity.as_ref()),
        issue.status.clone(),
        text(issue.resolution.as_ref()),
        date(issue.creation_date),
        date(issue.update_date),
        text(issue.project.as_ref()),
        text(issue.branch.as_ref()),
        text(issue.pull_request.as_ref()),
        issue.component.clone(),
        issue.line.map(|line| line.to_string()).unwrap_or_default(),
        issue.message.clone(),
        text(issue.effort.as_ref()),
        text(issue.author.as_ref()),
        text(issue.assignee.as_ref()),
        issue.tags.join(" "),
    ];
    if with_url {
        record.push(text(row.url.as_ref()));
    }
    record
}

pub fn write_csv<W: Write>(
    out: W,
    rows: &[IssueRow],
    separator: char,
    with_url: bool,
) -> anyhow::Result<()> {
    let mut writer = super::csv_writer(out, separator)?;
    let mut header: Vec<&str> = HEADER.to_vec();
    if with_url {
        header.push("URL");
    }
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(csv_record(row, with_url))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, rows: &[IssueRow]) -> anyhow::Result<()> {
    let mut objects = Vec::with_capacity(rows.len());
    for row in rows {
        let mut object = serde_json::to_value(&row.issue)?;
        if let (Some(url), Value::Object(map)) = (&row.url, &mut object) {
            map.insert("url".into(), Value::from(url.as_str()));
        }
        objects.push(object);
    }
    serde_json::to_writer_pretty(&mut out, &objects)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn write<W: Write>(
    out: W,
    format: OutputFormat,
    rows: &[IssueRow],
    separator: char,
    with_url: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => write_csv(out, rows, separator, with_url),
        OutputFormat::Json => write_json(out, rows),
    }
}
