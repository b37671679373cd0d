//! LoC report rows and their CSV and JSON renderings.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sq_core::enums::ComponentType;

use crate::cli::OutputFormat;

/// Lines of code of one project, application or portfolio, or of one of
/// their branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocRow {
    pub component: ComponentType,
    pub key: String,
    pub name: String,
    pub branch: Option<String>,
    /// `None` when the measure could not be fetched.
    pub ncloc: Option<u64>,
    pub last_analysis: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// Optional columns of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LocColumns {
    pub branch: bool,
    pub name: bool,
    pub last_analysis: bool,
    pub url: bool,
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn header(component: ComponentType, columns: LocColumns) -> Vec<String> {
    let kind = component.as_str();
    let mut header = vec![format!("# {kind} key")];
    if columns.branch {
        header.push("branch".into());
    }
    header.push("ncloc".into());
    if columns.name {
        header.push(format!("{kind} name"));
    }
    if columns.last_analysis {
        header.push("last analysis".into());
    }
    if columns.url {
        header.push("URL".into());
    }
    header
}

fn csv_record(row: &LocRow, columns: LocColumns) -> Vec<String> {
    let mut record = vec![row.key.clone()];
    if columns.branch {
        record.push(row.branch.clone().unwrap_or_default());
    }
    record.push(row.ncloc.map(|n| n.to_string()).unwrap_or_default());
    if columns.name {
        record.push(row.name.clone());
    }
    if columns.last_analysis {
        record.push(row.last_analysis.map(format_date).unwrap_or_default());
    }
    if columns.url {
        record.push(row.url.clone().unwrap_or_default());
    }
    record
}

fn json_object(row: &LocRow, columns: LocColumns) -> Value {
    let kind = row.component.as_str();
    let mut object = Map::new();
    object.insert(kind.into(), Value::from(row.key.as_str()));
    if columns.branch && let Some(branch) = &row.branch {
        object.insert("branch".into(), Value::from(branch.as_str()));
    }
    let ncloc = row.ncloc.map_or_else(|| Value::from(""), Value::from);
    object.insert("ncloc".into(), ncloc);
    if columns.name {
        object.insert(format!("{kind}Name"), Value::from(row.name.as_str()));
    }
    if columns.last_analysis && let Some(date) = row.last_analysis {
        object.insert("lastAnalysis".into(), Value::from(format_date(date)));
    }
    if columns.url && let Some(url) = &row.url {
        object.insert("url".into(), Value::from(url.as_str()));
    }
    Value::Object(object)
}

/// Write the report as CSV: one header line, then one line per row.
pub fn write_csv<W: Write>(
    out: W,
    component: ComponentType,
    rows: &[LocRow],
    columns: LocColumns,
    separator: char,
) -> anyhow::Result<()> {
    let mut writer = super::csv_writer(out, separator)?;
    writer.write_record(header(component, columns))?;
    for row in rows {
        writer.write_record(csv_record(row, columns))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the report as a JSON array.
pub fn write_json<W: Write>(mut out: W, rows: &[LocRow], columns: LocColumns) -> anyhow::Result<()> {
    let objects: Vec<Value> = rows.iter().map(|row| json_object(row, columns)).collect();
    serde_json::to_writer_pretty(&mut out, &objects)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn write<W: Write>(
    out: W,
    format: OutputFormat,
    component: ComponentType,
    rows: &[LocRow],
    columns: LocColumns,
    separator: char,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => write_csv(out, component, rows, columns, separator),
        OutputFormat::Json => write_json(out, rows, columns),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(key: &str, ncloc: Option<u64>) -> LocRow {
        LocRow {
            component: ComponentType::Project,
            key: key.into(),
            name: key.to_uppercase(),
            branch: None,
            ncloc,
            last_analysis: None,
            url: None,
        }
    }

    fn csv_string(rows: &[LocRow], columns: LocColumns) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, ComponentType::Project, rows, columns, ',').unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn unknown_loc_is_an_empty_field() {
        let csv = csv_string(&[row("a", Some(120)), row("b", None)], LocColumns::default());
        assert_eq!(csv, "# project key,ncloc\na,120\nb,\n");
    }

    #[test]
    fn optional_columns_in_order() {
        let mut with_all = row("a", Some(3));
        with_all.component = ComponentType::App;
        with_all.branch = Some("main".into());
        with_all.last_analysis = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap());
        with_all.url = Some("https://sonar/dashboard?id=a".into());
        let columns = LocColumns {
            branch: true,
            name: true,
            last_analysis: true,
            url: true,
        };

        let mut out = Vec::new();
        write_csv(&mut out, ComponentType::App, &[with_all.clone()], columns, ';').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# app key;branch;ncloc;app name;last analysis;URL\n\
             a;main;3;A;2024-03-01T09:15:00Z;https://sonar/dashboard?id=a\n"
        );

        let json = json_object(&with_all, columns);
        assert_eq!(json["app"], "a");
        assert_eq!(json["appName"], "A");
        assert_eq!(json["lastAnalysis"], "2024-03-01T09:15:00Z");
    }

    #[test]
    fn unknown_loc_is_an_empty_string_in_json() {
        let json = json_object(&row("b", None), LocColumns::default());
        assert_eq!(json["ncloc"], "");
        assert_eq!(json_object(&row("a", Some(7)), LocColumns::default())["ncloc"], 7);
    }

    #[test]
    fn json_and_csv_agree_on_keys_and_loc() {
        let rows = [row("a", Some(120)), row("b", None), row("c", Some(0))];
        let columns = LocColumns {
            name: true,
            ..LocColumns::default()
        };

        let csv = csv_string(&rows, columns);
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let from_csv: Vec<(String, String)> = reader
            .records()
            .map(|record| {
                let record = record.unwrap();
                (record[0].to_string(), record[1].to_string())
            })
            .collect();

        let mut out = Vec::new();
        write_json(&mut out, &rows, columns).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        let from_json: Vec<(String, String)> = parsed
            .iter()
            .map(|object| {
                let ncloc = match &object["ncloc"] {
                    Value::Number(n) => n.to_string(),
                    other => other.as_str().unwrap().to_string(),
                };
                (object["project"].as_str().unwrap().to_string(), ncloc)
            })
            .collect();

        assert_eq!(from_csv, from_json);
    }
}
