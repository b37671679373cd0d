//! Endpoint mapping against a mock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use sq_client::issues::IssueFilter;
use sq_client::{ClientError, SonarClient};
use sq_core::entities::IssueAction;
use sq_core::enums::Edition;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

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

#[tokio::test]
async fn server_info_combines_version_and_edition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/server/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("9.9.1.69595"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/navigation/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"edition": "enterprise"})))
        .mount(&server)
        .await;

    let info = client(&server).server_info().await.unwrap();
    assert_eq!(info.version.to_string(), "9.9.1");
    assert_eq!(info.edition, Edition::Enterprise);
}

#[tokio::test]
async fn branches_are_tagged_with_their_project() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project_branches/list"))
        .and(query_param("project", "my-app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "branches": [
                {"name": "main", "isMain": true},
                {"name": "develop", "isMain": false, "excludedFromPurge": true}
            ]
        })))
        .mount(&server)
        .await;

    let branches = client(&server).branches("my-app").await.unwrap();
    assert_eq!(branches.len(), 2);
    assert!(branches.iter().all(|branch| branch.project == "my-app"));
    assert!(branches.get("develop").unwrap().excluded_from_purge);
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/components/show"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"msg": "Component key 'nope' not found"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server).project("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn dump_import_without_endpoint_is_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/project_dump/import"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).import_project_dump("p").await.unwrap_err();
    assert!(matches!(err, ClientError::UnsupportedOperation(_)));
}

#[tokio::test]
async fn ncloc_on_a_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/measures/component"))
        .and(query_param("component", "p"))
        .and(query_param("branch", "develop"))
        .and(query_param("metricKeys", "ncloc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "component": {"key": "p", "measures": [{"metric": "ncloc", "value": "4200"}]}
        })))
        .mount(&server)
        .await;

    let ncloc = client(&server).ncloc("p", Some("develop")).await.unwrap();
    assert_eq!(ncloc, Some(4200));
}

#[tokio::test]
async fn comment_action_posts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/issues/add_comment"))
        .and(query_param("issue", "AX2"))
        .and(query_param("text", "checked, safe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .apply_issue_action("AX2", &IssueAction::AddComment("checked, safe".into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn export_splits_date_range_past_the_result_window() {
    let server = MockServer::start().await;

    // Unbounded search: too many results.
    Mock::given(method("GET"))
        .and(path("/api/issues/search"))
        .and(query_param_is_missing("createdAfter"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": {"pageIndex": 1, "pageSize": 500, "total": 15000},
            "issues": []
        })))
        .mount(&server)
        .await;
    // Oldest and newest creation dates.
    Mock::given(method("GET"))
        .and(path("/api/issues/search"))
        .and(query_param("s", "CREATION_DATE"))
        .and(query_param("asc", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": {"total": 15000},
            "issues": [issue("old", "2024-01-01T08:00:00+0000")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/issues/search"))
        .and(query_param("s", "CREATION_DATE"))
        .and(query_param("asc", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": {"total": 15000},
            "issues": [issue("new", "2024-01-02T08:00:00+0000")]
        })))
        .mount(&server)
        .await;
    // One slice per day.
    Mock::given(method("GET"))
        .and(path("/api/issues/search"))
        .and(query_param("createdAfter", "2024-01-01"))
        .and(query_param("createdBefore", "2024-01-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": {"total": 1},
            "issues": [issue("old", "2024-01-01T08:00:00+0000")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/issues/search"))
        .and(query_param("createdAfter", "2024-01-02"))
        .and(query_param("createdBefore", "2024-01-03"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": {"total": 1},
            "issues": [issue("new", "2024-01-02T08:00:00+0000")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let issues = client(&server)
        .export_issues(&IssueFilter::default())
        .await
        .unwrap();
    assert_eq!(issues.keys().collect::<Vec<_>>(), vec!["old", "new"]);
}
