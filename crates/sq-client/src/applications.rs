//! Applications (qualifier `APP`).

use sq_core::KeyedCollection;
use sq_core::entities::Application;

use crate::{ClientError, Query, Search, SonarClient};

impl SonarClient {
    /// All applications.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails.
    pub async fn applications(&self) -> Result<KeyedCollection<Application>, ClientError> {
        let search = Search::new("components/search_projects", "components")
            .param("filter", "qualifier = APP");
        self.search_all(&search).await
    }

    /// Delete an application.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the deletion is refused.
    pub async fn delete_application(&self, key: &str) -> Result<(), ClientError> {
        self.post("applications/delete", &Query::new().param("application", key))
            .await?;
        tracing::info!(application = key, "application deleted");
        Ok(())
    }
}
