//! Project pull requests.

use serde::Deserialize;
use sq_core::KeyedCollection;
use sq_core::entities::PullRequest;

use crate::{ClientError, Query, SonarClient};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestList {
    pull_requests: Vec<PullRequest>,
}

impl SonarClient {
    /// Pull requests of a project, each tagged with the project key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn pull_requests(
        &self,
        project: &str,
    ) -> Result<KeyedCollection<PullRequest>, ClientError> {
        let query = Query::new().param("project", project);
        let list: PullRequestList = self.get_json("project_pull_requests/list", &query).await?;
        Ok(list
            .pull_requests
            .into_iter()
            .map(|mut pr| {
                pr.project = project.to_string();
                pr
            })
            .collect())
    }

    /// Delete a pull request analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the deletion is refused.
    pub async fn delete_pull_request(&self, project: &str, key: &str) -> Result<(), ClientError> {
        let query = Query::new().param("project", project).param("pullRequest", key);
        self.post("project_pull_requests/delete", &query).await?;
        tracing::info!(project, pull_request = key, "pull request deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "pullRequests": [
            {"key": "123", "title": "Add feature", "branch": "feature/add",
             "base": "main", "analysisDate": "2024-02-01T10:00:00+0000"},
            {"key": "124", "title": "Fix", "branch": "fix/x", "base": "main"}
        ]
    }"#;

    #[test]
    fn parse_pull_request_list() {
        let list: PullRequestList = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(list.pull_requests.len(), 2);
        assert!(list.pull_requests[0].analysis_date.is_some());
        assert!(list.pull_requests[1].analysis_date.is_none());
    }
}
