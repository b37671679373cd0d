//! User groups.

use sq_core::KeyedCollection;
use sq_core::entities::Group;

use crate::{ClientError, Search, SonarClient};

impl SonarClient {
    /// All groups with their member counts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails.
    pub async fn groups(&self) -> Result<KeyedCollection<Group>, ClientError> {
        let search = Search::new("user_groups/search", "groups")
            .param("f", "name,description,membersCount");
        self.search_all(&search).await
    }
}
