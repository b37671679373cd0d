//! # sq-client
//!
//! Async client for the SonarQube web API.
//!
//! - [`SonarClient`]: authenticated GET/POST with status mapping
//! - [`search`]: generic paginated search into a [`KeyedCollection`]
//! - one module per API area (projects, branches, portfolios, quality
//!   profiles, users, groups, measures, issues, system)
//! - [`tasks`]: background task lookup and the completion poller
//!
//! [`KeyedCollection`]: sq_core::KeyedCollection

pub mod applications;
pub mod branches;
pub mod groups;
pub mod issues;
pub mod measures;
pub mod portfolios;
pub mod projects;
pub mod pull_requests;
pub mod quality_profiles;
pub mod search;
pub mod system;
pub mod tasks;
pub mod users;

mod error;
mod http;

pub use error::ClientError;
pub use http::Query;
pub use search::Search;
pub use tasks::{PollSchedule, TaskOutcome};

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::http::check_response;

/// Default page size of search endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client bound to one server and one token.
#[derive(Debug, Clone)]
pub struct SonarClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    page_size: u32,
}

impl SonarClient {
    /// Create a client for `base_url` (without the `/api` suffix).
    ///
    /// An empty token means anonymous access.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL is not http(s), or
    /// [`ClientError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("sonar-tools/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            token: (!token.is_empty()).then(|| token.to_string()),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the default page size of searches.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Browser URL of a project dashboard, optionally on a branch.
    #[must_use]
    pub fn dashboard_url(&self, project: &str, branch: Option<&str>) -> String {
        let query = Query::new().param("id", project).opt("branch", branch);
        format!("{}/dashboard?{}", self.base_url, query.encode())
    }

    /// Browser URL of one issue in its project's issue list.
    #[must_use]
    pub fn issue_url(&self, project: &str, issue: &str) -> String {
        let query = Query::new()
            .param("id", project)
            .param("issues", issue)
            .param("open", issue);
        format!("{}/project/issues?{}", self.base_url, query.encode())
    }

    fn api_url(&self, api: &str, query: &Query) -> String {
        let encoded = query.encode();
        if encoded.is_empty() {
            format!("{}/api/{api}", self.base_url)
        } else {
            format!("{}/api/{api}?{encoded}", self.base_url)
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.basic_auth(token, Some("")),
            None => request,
        }
    }

    /// GET an API endpoint and return the raw body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or error status.
    pub async fn get_text(&self, api: &str, query: &Query) -> Result<String, ClientError> {
        let url = self.api_url(api, query);
        tracing::debug!(%url, "GET");
        let resp = check_response(self.authorize(self.http.get(&url)).send().await?).await?;
        Ok(resp.text().await?)
    }

    /// GET an API endpoint and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, error status, or if the
    /// body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        api: &str,
        query: &Query,
    ) -> Result<T, ClientError> {
        let body = self.get_text(api, query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST to a mutation endpoint with parameters in the query string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or error status.
    pub async fn post(&self, api: &str, query: &Query) -> Result<String, ClientError> {
        let url = self.api_url(api, query);
        tracing::debug!(%url, "POST");
        let resp = check_response(self.authorize(self.http.post(&url)).send().await?).await?;
        Ok(resp.text().await?)
    }

    /// POST and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post`], plus [`ClientError::Parse`] for an
    /// unexpected body.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        api: &str,
        query: &Query,
    ) -> Result<T, ClientError> {
        let body = self.post(api, query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SonarClient {
        SonarClient::new("https://sonar.example.com/", "squ_x", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rejects_non_http_url() {
        let err = SonarClient::new("sonar.example.com", "", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn builds_api_urls() {
        let client = client();
        assert_eq!(client.base_url(), "https://sonar.example.com");
        assert_eq!(
            client.api_url("server/version", &Query::new()),
            "https://sonar.example.com/api/server/version"
        );
        assert_eq!(
            client.api_url("projects/search", &Query::new().param("p", 2).param("ps", 100)),
            "https://sonar.example.com/api/projects/search?p=2&ps=100"
        );
    }

    #[test]
    fn dashboard_url_with_branch() {
        assert_eq!(
            client().dashboard_url("my app", Some("feature/x")),
            "https://sonar.example.com/dashboard?id=my%20app&branch=feature%2Fx"
        );
    }

    #[test]
    fn issue_url_opens_the_issue() {
        assert_eq!(
            client().issue_url("p", "AX1"),
            "https://sonar.example.com/project/issues?id=p&issues=AX1&open=AX1"
        );
    }

    #[test]
    fn page_size_is_at_least_one() {
        assert_eq!(client().with_page_size(0).page_size(), 1);
        assert_eq!(client().page_size(), DEFAULT_PAGE_SIZE);
    }
}
