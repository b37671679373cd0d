//! Cluster audit of a system info file (SIF).
//!
//! Only the `Application Nodes` section is audited. A single node is
//! reported as not highly available and nothing else is checked; with two
//! or more nodes each node is checked on its own, then every unordered pair
//! is compared for version and plugin differences.

use std::path::Path;

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde_json::Value;
use sq_core::dates;
use sq_core::{ConcernedObject, Problem, Version};

use crate::error::AuditError;
use crate::rules::RuleId;

const APP_NODES: &str = "Application Nodes";
const HEALTH_GREEN: &str = "GREEN";

/// LTS releases and their release dates. A server started more than six
/// months after a release should run at least that version.
const LTS_RELEASES: [(Version, (i32, u32, u32)); 3] = [
    (Version::new(6, 7, 0), (2017, 11, 8)),
    (Version::new(7, 9, 0), (2019, 7, 1)),
    (Version::new(8, 9, 0), (2021, 5, 4)),
];

/// One entry of the `Application Nodes` array.
struct AppNode<'a> {
    json: &'a Value,
}

impl<'a> AppNode<'a> {
    fn name(&self) -> &'a str {
        self.json.get("Name").and_then(Value::as_str).unwrap_or("unknown")
    }

    fn object(&self) -> ConcernedObject {
        ConcernedObject::AppNode {
            name: self.name().to_string(),
        }
    }

    fn health(&self) -> &'a str {
        self.json.get("Health").and_then(Value::as_str).unwrap_or("RED")
    }

    fn version(&self) -> Option<Version> {
        self.json
            .pointer("/System/Version")
            .and_then(Value::as_str)
            .and_then(|raw| Version::parse(raw).ok())
    }

    fn plugins(&self) -> Option<&'a Value> {
        self.json.get("Plugins")
    }

    fn start_time(&self) -> Option<DateTime<Utc>> {
        self.json
            .pointer("/System/Start Time")
            .and_then(Value::as_str)
            .and_then(|raw| dates::parse(raw).ok())
    }

    fn audit_official(&self) -> Option<Problem> {
        let Some(system) = self.json.get("System") else {
            tracing::warn!(node = self.name(), "official distribution information missing, check skipped");
            return None;
        };
        let official = system
            .get("Official Distribution")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        (!official).then(|| {
            RuleId::AppNodeUnofficialDistro
                .problem(format!(
                    "{} does not run an official distribution",
                    self.object().describe()
                ))
                .concerning(self.object())
        })
    }

    fn audit_health(&self) -> Option<Problem> {
        let health = self.health();
        (health != HEALTH_GREEN).then(|| {
            RuleId::AppNodeNotGreen
                .problem(format!("{} health is {health}", self.object().describe()))
                .concerning(self.object())
        })
    }

    fn audit_version(&self, started: DateTime<Utc>) -> Option<Problem> {
        let Some(version) = self.version() else {
            tracing::warn!(node = self.name(), "version information missing, LTS check skipped");
            return None;
        };
        let started = started.date_naive();
        let below = lts_cutoffs().any(|(lts, cutoff)| started > cutoff && version < lts);
        below.then(|| {
            RuleId::BelowLts
                .problem(format!(
                    "{} runs {version}, older than the LTS available when it started",
                    self.object().describe()
                ))
                .concerning(self.object())
        })
    }
}

/// `(lts version, release date + 6 months)` pairs.
fn lts_cutoffs() -> impl Iterator<Item = (Version, NaiveDate)> {
    LTS_RELEASES.into_iter().filter_map(|(version, (y, m, d))| {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|released| released.checked_add_months(Months::new(6)))
            .map(|cutoff| (version, cutoff))
    })
}

fn pair_problem(rule: RuleId, what: &str, a: &AppNode<'_>, b: &AppNode<'_>) -> Problem {
    rule.problem(format!(
        "{} and {} have different {what}",
        a.object().describe(),
        b.object().describe()
    ))
}

/// Audit the application nodes of a parsed SIF.
///
/// `now` stands in for a node start time absent from the file.
#[must_use]
pub fn audit_sif(sif: &Value, now: DateTime<Utc>) -> Vec<Problem> {
    let Some(entries) = sif.get(APP_NODES).and_then(Value::as_array) else {
        tracing::info!("no application nodes in system info, not a clustered server");
        return Vec::new();
    };
    let nodes: Vec<AppNode<'_>> = entries.iter().map(|json| AppNode { json }).collect();
    tracing::info!(nodes = nodes.len(), "auditing application nodes");

    if nodes.len() == 1 {
        return vec![RuleId::AppClusterNotHa.problem(
            "Cluster has a single application node, it is not highly available",
        )];
    }

    let fallback_start = sif
        .pointer("/System/Start Time")
        .and_then(Value::as_str)
        .and_then(|raw| dates::parse(raw).ok())
        .unwrap_or(now);

    let mut problems = Vec::new();
    for node in &nodes {
        problems.extend(node.audit_official());
        problems.extend(node.audit_health());
        problems.extend(node.audit_version(node.start_time().unwrap_or(fallback_start)));
    }

    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            if let (Some(va), Some(vb)) = (a.version(), b.version())
                && va != vb
            {
                problems.push(pair_problem(RuleId::AppNodesDifferentVersions, "versions", a, b));
            }
            if a.plugins() != b.plugins() {
                problems.push(pair_problem(RuleId::AppNodesDifferentPlugins, "plugins", a, b));
            }
        }
    }
    problems
}

/// Read and audit a SIF from disk.
///
/// # Errors
///
/// Returns [`AuditError::Sif`] if the file cannot be read or is not JSON.
pub fn audit_sif_file(path: &Path, now: DateTime<Utc>) -> Result<Vec<Problem>, AuditError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AuditError::Sif(format!("{}: {e}", path.display())))?;
    let sif: Value = serde_json::from_str(&raw)
        .map_err(|e| AuditError::Sif(format!("{}: {e}", path.display())))?;
    Ok(audit_sif(&sif, now))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn node(name: &str, version: &str, plugins: Value) -> Value {
        json!({
            "Name": name,
            "Health": "GREEN",
            "System": {"Version": version, "Official Distribution": true},
            "Plugins": plugins
        })
    }

    fn rules(problems: &[Problem]) -> Vec<&str> {
        problems.iter().map(|p| p.rule.as_str()).collect()
    }

    #[test]
    fn single_node_is_one_problem_only() {
        let sif = json!({
            "Application Nodes": [{"Name": "n1", "Health": "RED", "System": {"Version": "7.0", "Official Distribution": false}}]
        });
        let problems = audit_sif(&sif, now());
        assert_eq!(rules(&problems), vec!["DCE_APP_CLUSTER_NOT_HA"]);
    }

    #[test]
    fn healthy_identical_nodes_pass() {
        let plugins = json!({"java": "7.30"});
        let sif = json!({
            "Application Nodes": [
                node("n1", "9.9.1.69595", plugins.clone()),
                node("n2", "9.9.1.69595", plugins),
            ]
        });
        assert!(audit_sif(&sif, now()).is_empty());
    }

    #[test]
    fn pairwise_differences_per_unordered_pair() {
        let sif = json!({
            "Application Nodes": [
                node("n1", "9.9.1", json!({"java": "7.30"})),
                node("n2", "9.9.1", json!({"java": "7.30"})),
                node("n3", "9.9.2", json!({"java": "7.31"})),
            ]
        });
        let problems = audit_sif(&sif, now());
        let versions = problems
            .iter()
            .filter(|p| p.rule == "DCE_DIFFERENT_APP_NODES_VERSIONS")
            .count();
        let plugins = problems
            .iter()
            .filter(|p| p.rule == "DCE_DIFFERENT_APP_NODES_PLUGINS")
            .count();
        assert_eq!(versions, 2);
        assert_eq!(plugins, 2);
        assert_eq!(problems.len(), 4);
    }

    #[test]
    fn per_node_checks() {
        let mut red = node("n2", "8.9.0", json!({}));
        red["Health"] = json!("YELLOW");
        red["System"]["Official Distribution"] = json!(false);
        let sif = json!({"Application Nodes": [node("n1", "8.9.0", json!({})), red]});
        assert_eq!(
            rules(&audit_sif(&sif, now())),
            vec!["DCE_APP_NODE_UNOFFICIAL_DISTRO", "DCE_APP_NODE_NOT_GREEN"]
        );
    }

    #[test]
    fn below_lts_depends_on_start_time() {
        let sif = json!({
            "System": {"Start Time": "2019-06-01T10:00:00+0000"},
            "Application Nodes": [node("n1", "7.8", json!({})), node("n2", "7.8", json!({}))]
        });
        assert!(audit_sif(&sif, now()).is_empty());

        let sif = json!({
            "Application Nodes": [node("n1", "7.8", json!({})), node("n2", "7.8", json!({}))]
        });
        assert_eq!(
            rules(&audit_sif(&sif, now())),
            vec!["BELOW_LTS", "BELOW_LTS"]
        );
    }

    #[test]
    fn lts_cutoffs_add_six_calendar_months() {
        let cutoffs: Vec<NaiveDate> = lts_cutoffs().map(|(_, date)| date).collect();
        assert_eq!(cutoffs[0], NaiveDate::from_ymd_opt(2018, 5, 8).unwrap());
        assert_eq!(cutoffs[2], NaiveDate::from_ymd_opt(2021, 11, 4).unwrap());
    }

    #[test]
    fn no_app_nodes_section() {
        assert!(audit_sif(&json!({"System": {}}), now()).is_empty());
    }

    #[test]
    fn unreadable_file_is_a_sif_error() {
        let err = audit_sif_file(Path::new("/nonexistent/sif.json"), now()).unwrap_err();
        assert!(matches!(err, AuditError::Sif(_)));
    }
}
