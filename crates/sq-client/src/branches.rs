//! Project branches.

use serde::Deserialize;
use sq_core::KeyedCollection;
use sq_core::entities::Branch;

use crate::{ClientError, Query, SonarClient};

#[derive(Deserialize)]
struct BranchList {
    branches: Vec<Branch>,
}

impl SonarClient {
    /// Branches of a project, each tagged with the project key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn branches(&self, project: &str) -> Result<KeyedCollection<Branch>, ClientError> {
        let query = Query::new().param("project", project);
        let list: BranchList = self.get_json("project_branches/list", &query).await?;
        Ok(list
            .branches
            .into_iter()
            .map(|mut branch| {
                branch.project = project.to_string();
                branch
            })
            .collect())
    }

    /// Delete a (non-main) branch.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the deletion is refused.
    pub async fn delete_branch(&self, project: &str, branch: &str) -> Result<(), ClientError> {
        let query = Query::new().param("project", project).param("branch", branch);
        self.post("project_branches/delete", &query).await?;
        tracing::info!(project, branch, "branch deleted");
        Ok(())
    }
}
