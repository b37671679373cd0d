//! Projects: search, lookup, creation, deletion and dump import.

use serde::Deserialize;
use sq_core::KeyedCollection;
use sq_core::entities::Project;

use crate::{ClientError, Query, Search, SonarClient};

#[derive(Deserialize)]
struct ShowResponse {
    component: Project,
}

#[derive(Deserialize)]
struct CreateResponse {
    project: Project,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    task_id: String,
}

impl SonarClient {
    /// All projects, or only `keys` when non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails.
    pub async fn projects(&self, keys: &[String]) -> Result<KeyedCollection<Project>, ClientError> {
        let query = Query::new().list("projects", keys);
        self.search_all(&Search::new("projects/search", "components").query(query))
            .await
    }

    /// Look up one project.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the key does not exist.
    pub async fn project(&self, key: &str) -> Result<Project, ClientError> {
        let query = Query::new().param("component", key);
        let resp: ShowResponse = self.get_json("components/show", &query).await?;
        Ok(resp.component)
    }

    /// Create a project.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] (status 400) if the key already exists.
    pub async fn create_project(&self, key: &str, name: &str) -> Result<Project, ClientError> {
        let query = Query::new().param("project", key).param("name", name);
        let resp: CreateResponse = self.post_json("projects/create", &query).await?;
        tracing::info!(project = key, "project created");
        Ok(resp.project)
    }

    /// Delete a project with all its branches and pull requests.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the deletion is refused.
    pub async fn delete_project(&self, key: &str) -> Result<(), ClientError> {
        self.post("projects/delete", &Query::new().param("project", key))
            .await?;
        tracing::info!(project = key, "project deleted");
        Ok(())
    }

    /// Import the dump previously uploaded for `key`; returns the id of the
    /// background task doing the import.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnsupportedOperation`] when the server edition
    /// has no project dump support (404), or other [`ClientError`]s.
    pub async fn import_project_dump(&self, key: &str) -> Result<String, ClientError> {
        let query = Query::new().param("key", key);
        let resp: ImportResponse = self
            .post_json("project_dump/import", &query)
            .await
            .map_err(|e| match e {
                ClientError::NotFound(_) => ClientError::UnsupportedOperation(
                    "project dump import requires enterprise edition or above".into(),
                ),
                other => other,
            })?;
        Ok(resp.task_id)
    }
}
