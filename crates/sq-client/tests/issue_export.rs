//! Issue export past the 10 000 result window, against a mock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use sq_client::SonarClient;
use sq_client::issues::IssueFilter;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SonarClient {
    SonarClient::new(&server.uri(), "squ_test", Duration::from_secs(5)).unwrap()
}

fn issue(key: &str, created: &str) -> serde_json::Value {
    json!({
        "key": key,
        "rule": "java:S1135",
        "component": "p:src/Main.java",
        "project": "p",
        "message": "Complete the task",
        "status": "OPEN",
        "creationDate": created
    })
}

fn page(total: u64, issues: &[serde_json::Value]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "paging": {"pageIndex": 1, "pageSize": 500, "total": total},
        "issues": issues
    }))
}

fn search() -> MockBuilder {
    Mock::given(method("GET")).and(path("/api/issues/search"))
}

/// Oldest and newest issue of every search, both on the same server day.
async fn mount_boundaries(server: &MockServer, oldest: &str, newest: &str) {
    search()
        .and(query_param("s", "CREATION_DATE"))
        .and(query_param("asc", "true"))
        .respond_with(page(20_000, &[issue("oldest", oldest)]))
        .with_priority(1)
        .mount(server)
        .await;
    search()
        .and(query_param("s", "CREATION_DATE"))
        .and(query_param("asc", "false"))
        .respond_with(page(20_000, &[issue("newest", newest)]))
        .with_priority(1)
        .mount(server)
        .await;
}

async fn export(server: &MockServer, filter: &IssueFilter) -> Vec<String> {
    let issues = tokio::time::timeout(
        Duration::from_secs(5),
        client(server).export_issues(filter),
    )
    .await
    .expect("export did not finish")
    .unwrap();
    issues.keys().map(str::to_string).collect()
}

#[tokio::test]
async fn server_day_crossing_utc_midnight_is_not_split_again() {
    let server = MockServer::start().await;
    // 00:30 at +0100 is still the previous day in UTC.
    mount_boundaries(
        &server,
        "2024-01-01T00:30:00+0100",
        "2024-01-01T23:00:00+0100",
    )
    .await;
    search()
        .and(query_param("createdAfter", "2023-12-31"))
        .respond_with(page(0, &[]))
        .with_priority(1)
        .expect(0)
        .mount(&server)
        .await;
    search()
        .and(query_param("severities", "MAJOR"))
        .respond_with(page(
            2,
            &[
                issue("first", "2024-01-01T00:30:00+0100"),
                issue("last", "2024-01-01T23:00:00+0100"),
            ],
        ))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;
    search()
        .and(query_param_is_missing("severities"))
        .respond_with(page(20_000, &[]))
        .with_priority(3)
        .mount(&server)
        .await;
    search()
        .respond_with(page(0, &[]))
        .with_priority(10)
        .mount(&server)
        .await;

    let keys = export(&server, &IssueFilter::default()).await;
    assert_eq!(keys, vec!["first", "last"]);
}

#[tokio::test]
async fn single_day_splits_by_severity_then_type() {
    let server = MockServer::start().await;
    // 22:00 at -0500 is already the next day in UTC.
    mount_boundaries(
        &server,
        "2024-03-01T09:00:00-0500",
        "2024-03-01T22:00:00-0500",
    )
    .await;
    search()
        .and(query_param("severities", "BLOCKER"))
        .and(query_param("types", "BUG"))
        .respond_with(page(1, &[issue("bug", "2024-03-01T10:00:00-0500")]))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;
    search()
        .and(query_param("severities", "BLOCKER"))
        .and(query_param("types", "VULNERABILITY"))
        .respond_with(page(1, &[issue("vuln", "2024-03-01T11:00:00-0500")]))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;
    search()
        .and(query_param("severities", "BLOCKER"))
        .and(query_param_is_missing("types"))
        .respond_with(page(12_000, &[]))
        .with_priority(3)
        .mount(&server)
        .await;
    search()
        .and(query_param("severities", "MINOR"))
        .respond_with(page(1, &[issue("minor", "2024-03-01T12:00:00-0500")]))
        .with_priority(3)
        .expect(1)
        .mount(&server)
        .await;
    search()
        .and(query_param_is_missing("severities"))
        .respond_with(page(30_000, &[]))
        .with_priority(3)
        .mount(&server)
        .await;
    search()
        .respond_with(page(0, &[]))
        .with_priority(10)
        .mount(&server)
        .await;

    let filter = IssueFilter {
        created_after: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
        created_before: chrono::NaiveDate::from_ymd_opt(2024, 3, 2),
        ..IssueFilter::default()
    };
    let keys = export(&server, &filter).await;
    assert_eq!(keys, vec!["bug", "vuln", "minor"]);
}

#[tokio::test]
async fn pinned_severity_and_type_split_by_directory() {
    let server = MockServer::start().await;
    mount_boundaries(
        &server,
        "2024-03-01T09:00:00+0000",
        "2024-03-01T18:00:00+0000",
    )
    .await;
    search()
        .and(query_param("facets", "directories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": {"total": 12_000},
            "issues": [],
            "facets": [{
                "property": "directories",
                "values": [
                    {"val": "src/api", "count": 7000},
                    {"val": "src/core", "count": 5000}
                ]
            }]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    search()
        .and(query_param("directories", "src/api"))
        .respond_with(page(1, &[issue("api", "2024-03-01T10:00:00+0000")]))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;
    search()
        .and(query_param("directories", "src/core"))
        .respond_with(page(1, &[issue("core", "2024-03-01T11:00:00+0000")]))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;
    search()
        .and(query_param_is_missing("directories"))
        .respond_with(page(12_000, &[]))
        .with_priority(3)
        .mount(&server)
        .await;

    let filter = IssueFilter {
        severities: vec!["MAJOR".into()],
        types: vec!["BUG".into()],
        ..IssueFilter::default()
    };
    let keys = export(&server, &filter).await;
    assert_eq!(keys, vec!["api", "core"]);
}
