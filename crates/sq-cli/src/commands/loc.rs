use sq_client::{ClientError, SonarClient};
use sq_core::enums::{ComponentType, Edition};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LocArgs;
use crate::context::AppContext;
use crate::exit_codes::CliError;
use crate::output::{self, loc::LocColumns, loc::LocRow};
use crate::progress::Progress;

const PROGRESS_EVERY: usize = 50;

/// One object, or one branch of an object, to measure.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    key: String,
    name: String,
    branch: Option<String>,
}

impl Target {
    fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            branch: None,
        }
    }
}

/// Handle `sqt loc`.
pub async fn handle(args: &LocArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let component = ComponentType::from(args.component_type);
    let with_branches = branches_allowed(component, ctx.server.edition, args.with_branches)?;

    let spinner = Progress::spinner(&format!("collecting {component}s"));
    let targets = collect_targets(&ctx.client, component, args, with_branches).await;
    spinner.finish_clear();
    let targets = targets?;
    tracing::info!(%component, count = targets.len(), "measuring lines of code");

    let columns = LocColumns {
        branch: with_branches,
        name: args.with_name,
        last_analysis: args.with_last_analysis,
        url: args.with_url,
    };
    let rows = measure_rows(&ctx.client, component, targets, columns).await;

    let out = output::open(flags.file.as_deref())?;
    output::loc::write(
        out,
        flags.output_format(),
        component,
        &rows,
        columns,
        ctx.config.general.csv_separator,
    )
}

/// Whether rows are exported per branch, or an error when the edition has no
/// such objects at all.
fn branches_allowed(
    component: ComponentType,
    edition: Edition,
    requested: bool,
) -> Result<bool, CliError> {
    match component {
        ComponentType::Portfolio if !edition.supports_portfolios() => Err(CliError::unsupported(
            format!("no portfolios in {edition} edition"),
        )),
        ComponentType::App if !edition.supports_applications() => Err(CliError::unsupported(
            format!("no applications in {edition} edition"),
        )),
        ComponentType::Portfolio | ComponentType::App if requested => {
            tracing::warn!(%component, "branch option is ignored for this component type");
            Ok(false)
        }
        ComponentType::Project if requested && !edition.supports_branches() => {
            tracing::warn!(%edition, "no branches in this edition, branch option is ignored");
            Ok(false)
        }
        _ => Ok(requested),
    }
}

fn keep(keys: &[String], key: &str) -> bool {
    keys.is_empty() || keys.iter().any(|k| k == key)
}

async fn collect_targets(
    client: &SonarClient,
    component: ComponentType,
    args: &LocArgs,
    with_branches: bool,
) -> Result<Vec<Target>, ClientError> {
    let targets: Vec<Target> = match component {
        ComponentType::Portfolio => client
            .portfolios(args.top_level_only)
            .await?
            .iter()
            .filter(|p| keep(&args.keys, &p.key))
            .map(|p| Target::new(&p.key, &p.name))
            .collect(),
        ComponentType::App => client
            .applications()
            .await?
            .iter()
            .filter(|a| keep(&args.keys, &a.key))
            .map(|a| Target::new(&a.key, &a.name))
            .collect(),
        ComponentType::Project => {
            let projects = client.projects(&args.keys).await?;
            if !with_branches {
                return Ok(projects.iter().map(|p| Target::new(&p.key, &p.name)).collect());
            }
            let mut targets = Vec::new();
            for project in &projects {
                match client.branches(&project.key).await {
                    Ok(branches) => targets.extend(branches.into_iter().map(|branch| Target {
                        branch: Some(branch.name),
                        ..Target::new(&project.key, &project.name)
                    })),
                    Err(e) => {
                        tracing::warn!(project = %project.key, error = %e, "failed to list branches, exporting the project only");
                        targets.push(Target::new(&project.key, &project.name));
                    }
                }
            }
            targets
        }
    };
    Ok(targets)
}

/// Measure every target, one after another. A failed measure leaves the LoC
/// empty and never drops the row.
async fn measure_rows(
    client: &SonarClient,
    component: ComponentType,
    targets: Vec<Target>,
    columns: LocColumns,
) -> Vec<LocRow> {
    let total = targets.len();
    let mut rows = Vec::with_capacity(total);

    for (done, target) in targets.into_iter().enumerate() {
        let branch = target.branch.as_deref();
        let ncloc = match client.ncloc(&target.key, branch).await {
            Ok(ncloc) => Some(ncloc.unwrap_or(0)),
            Err(e) => {
                tracing::warn!(key = %target.key, ?branch, error = %e, "LoC export skipped");
                None
            }
        };

        let last_analysis = if columns.last_analysis && ncloc.is_some() {
            client
                .last_analysis(&target.key, branch)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(key = %target.key, error = %e, "last analysis date unavailable");
                    None
                })
        } else {
            None
        };

        let url = columns
            .url
            .then(|| client.dashboard_url(&target.key, branch));

        rows.push(LocRow {
            component,
            key: target.key,
            name: target.name,
            branch: target.branch,
            ncloc,
            last_analysis,
            url,
        });

        if (done + 1) % PROGRESS_EVERY == 0 {
            tracing::info!("{}/{total} {component}s measured", done + 1);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn portfolios_need_enterprise() {
        let err = branches_allowed(ComponentType::Portfolio, Edition::Developer, false).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::UNSUPPORTED_OPERATION);
        assert!(!branches_allowed(ComponentType::Portfolio, Edition::Enterprise, true).unwrap());
    }

    #[test]
    fn branches_ignored_on_community() {
        assert!(!branches_allowed(ComponentType::Project, Edition::Community, true).unwrap());
        assert!(branches_allowed(ComponentType::Project, Edition::Developer, true).unwrap());
        assert!(!branches_allowed(ComponentType::Project, Edition::Developer, false).unwrap());
    }

    #[test]
    fn key_filter() {
        assert!(keep(&[], "a"));
        assert!(keep(&["a".into(), "b".into()], "b"));
        assert!(!keep(&["a".into()], "c"));
    }

    fn ncloc_body(value: &str) -> serde_json::Value {
        serde_json::json!({
            "component": {"key": "k", "measures": [{"metric": "ncloc", "value": value}]}
        })
    }

    #[tokio::test]
    async fn failed_measure_keeps_an_empty_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/measures/component"))
            .and(query_param("component", "good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ncloc_body("1200")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/measures/component"))
            .and(query_param("component", "broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = SonarClient::new(&server.uri(), "", Duration::from_secs(5)).unwrap();
        let targets = vec![Target::new("good", "Good"), Target::new("broken", "Broken")];
        let columns = LocColumns {
            branch: false,
            name: false,
            last_analysis: true,
            url: false,
        };
        let rows = measure_rows(&client, ComponentType::Project, targets, columns).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ncloc, Some(1200));
        assert_eq!(rows[1].ncloc, None);
        assert_eq!(rows[1].last_analysis, None);

        let mut out = Vec::new();
        output::loc::write_csv(&mut out, ComponentType::Project, &rows, columns, ',').unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.lines().any(|line| line == "broken,,"));
    }
}
