//! Portfolios (qualifiers `VW` and `SVW`).

use sq_core::KeyedCollection;
use sq_core::entities::Portfolio;

use crate::{ClientError, Query, Search, SonarClient};

impl SonarClient {
    /// Portfolios; with `top_level_only`, sub-portfolios are left out.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails.
    pub async fn portfolios(
        &self,
        top_level_only: bool,
    ) -> Result<KeyedCollection<Portfolio>, ClientError> {
        let qualifiers = if top_level_only { "VW" } else { "VW,SVW" };
        let search = Search::new("views/search", "components").param("qualifiers", qualifiers);
        self.search_all(&search).await
    }

    /// Delete a portfolio.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the deletion is refused.
    pub async fn delete_portfolio(&self, key: &str) -> Result<(), ClientError> {
        self.post("views/delete", &Query::new().param("key", key))
            .await?;
        tracing::info!(portfolio = key, "portfolio deleted");
        Ok(())
    }
}
