use std::time::Duration;

use anyhow::Context;
use sq_client::SonarClient;
use sq_config::SonarConfig;
use sq_core::entities::ServerInfo;

/// Shared application resources initialized once at startup.
#[derive(Debug)]
pub struct AppContext {
    pub client: SonarClient,
    pub server: ServerInfo,
    pub config: SonarConfig,
}

impl AppContext {
    /// Build the client and fetch the server version and edition.
    pub async fn init(config: SonarConfig) -> anyhow::Result<Self> {
        let client = SonarClient::new(
            config.server.base_url(),
            &config.server.token,
            Duration::from_secs(config.server.timeout_secs),
        )
        .context("failed to build the HTTP client")?
        .with_page_size(config.general.page_size);

        let server = client
            .server_info()
            .await
            .with_context(|| format!("failed to query {}", client.base_url()))?;
        tracing::info!(
            url = client.base_url(),
            version = %server.version,
            edition = %server.edition,
            "connected"
        );

        Ok(Self {
            client,
            server,
            config,
        })
    }
}
