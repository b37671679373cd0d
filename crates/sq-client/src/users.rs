//! Users and their tokens.

use serde::Deserialize;
use sq_core::KeyedCollection;
use sq_core::entities::{User, UserToken};

use crate::{ClientError, Query, Search, SonarClient};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenList {
    login: String,
    user_tokens: Vec<UserToken>,
}

impl SonarClient {
    /// All active users.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails.
    pub async fn users(&self) -> Result<KeyedCollection<User>, ClientError> {
        self.search_all(&Search::new("users/search", "users")).await
    }

    /// Tokens of one user, each tagged with the login.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn user_tokens(&self, login: &str) -> Result<KeyedCollection<UserToken>, ClientError> {
        let list: TokenList = self
            .get_json("user_tokens/search", &Query::new().param("login", login))
            .await?;
        let owner = list.login;
        Ok(list
            .user_tokens
            .into_iter()
            .map(|mut token| {
                token.login.clone_from(&owner);
                token
            })
            .collect())
    }

    /// Revoke a user token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the revocation is refused.
    pub async fn revoke_token(&self, login: &str, name: &str) -> Result<(), ClientError> {
        let query = Query::new().param("login", login).param("name", name);
        self.post("user_tokens/revoke", &query).await?;
        tracing::info!(login, token = name, "token revoked");
        Ok(())
    }
}
