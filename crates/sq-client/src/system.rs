//! Server version and edition.

use serde::Deserialize;
use sq_core::Version;
use sq_core::entities::ServerInfo;
use sq_core::enums::Edition;

use crate::{ClientError, Query, SonarClient};

#[derive(Deserialize)]
struct GlobalNavigation {
    #[serde(default)]
    edition: Option<String>,
}

fn parse_edition(navigation: &GlobalNavigation) -> Result<Edition, ClientError> {
    match navigation.edition.as_deref() {
        // Servers before 7.x do not report an edition.
        None | Some("") => Ok(Edition::Community),
        Some(edition) => Ok(edition.parse()?),
    }
}

impl SonarClient {
    /// Server version, from `server/version`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the version is
    /// malformed.
    pub async fn server_version(&self) -> Result<Version, ClientError> {
        let text = self.get_text("server/version", &Query::new()).await?;
        Ok(Version::parse(&text)?)
    }

    /// Server edition, from `navigation/global`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the edition is unknown.
    pub async fn edition(&self) -> Result<Edition, ClientError> {
        let navigation: GlobalNavigation =
            self.get_json("navigation/global", &Query::new()).await?;
        parse_edition(&navigation)
    }

    /// Version and edition, fetched once per invocation.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if either lookup fails.
    pub async fn server_info(&self) -> Result<ServerInfo, ClientError> {
        let version = self.server_version().await?;
        let edition = self.edition().await?;
        tracing::debug!(%version, %edition, "server info");
        Ok(ServerInfo::new(version, edition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_edition_means_community() {
        let navigation: GlobalNavigation = serde_json::from_str(r#"{"qualifiers": ["TRK"]}"#).unwrap();
        assert_eq!(parse_edition(&navigation).unwrap(), Edition::Community);
    }

    #[test]
    fn reads_edition() {
        let navigation: GlobalNavigation =
            serde_json::from_str(r#"{"edition": "datacenter", "version": "9.9.1"}"#).unwrap();
        assert_eq!(parse_edition(&navigation).unwrap(), Edition::Datacenter);
    }
}
