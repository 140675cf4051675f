//! HTTP client for the OpenBlu directory API.

use openblu_core::api::{self, Endpoint, ServerInfoResponse, ServerListResponse};
use openblu_core::{OpenBluError, Result, ServerInfo, ServerRecord};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Normalize a base URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Shorten an API key for diagnostics.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// HTTP client for the OpenBlu REST API.
///
/// Requests are sent one at a time and never retried. Every request carries
/// the access key as the `access_key` query parameter.
///
/// # Examples
///
/// ```no_run
/// use openbluctl::client::OpenBluClient;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = OpenBluClient::with_config(
///     "https://api.intellivoid.info/openblu/v1".to_string(),
///     10, // timeout in seconds
/// )?;
///
/// let servers = client.list_servers("my-access-key").await?;
/// println!("{} servers available", servers.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenBluClient {
    client: Client,
    base_url: String,
}

impl OpenBluClient {
    /// Create a client for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns a network error if the HTTP client cannot be created.
    pub fn with_config(endpoint: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("openbluctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OpenBluError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_url(&endpoint),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Process an HTTP response and extract the payload.
    ///
    /// The API reports failures both through the HTTP status and through the
    /// `success`/`response_code` envelope; a JSON envelope is preferred when
    /// the body has one because it carries the error message.
    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        endpoint: &Endpoint,
    ) -> Result<T> {
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            OpenBluError::Network(format!(
                "Failed to read response body from {}: {}",
                endpoint.path(),
                e
            ))
        })?;

        debug!(status = status.as_u16(), bytes = text.len(), "response from {}", endpoint.path());

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<api::ApiStatus>(&text) {
                envelope.check(endpoint)?;
            }
            let message = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            return Err(api::status_error(endpoint, status.as_u16(), message));
        }

        api::decode(endpoint, &text)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| OpenBluError::Network(format!("Failed to reach {}: {}", url, e)))?;

        Self::handle_response(response, endpoint).await
    }

    /// Retrieve every server listed in the directory.
    ///
    /// # Errors
    ///
    /// - `Auth` if the key is rejected
    /// - `Network` on transport failure
    /// - `Parse` if the response is not the expected JSON
    pub async fn list_servers(&self, api_key: &str) -> Result<Vec<ServerRecord>> {
        debug!(key = %mask_key(api_key), "listing servers");

        let response: ServerListResponse = self
            .get(&Endpoint::ListServers, &[("access_key", api_key)])
            .await?;
        Ok(response.servers)
    }

    /// Retrieve the detail and OpenVPN configuration of one server.
    ///
    /// # Errors
    ///
    /// Same as [`list_servers`](Self::list_servers), plus `NotFound` when the
    /// identifier is unknown.
    pub async fn get_server_info(&self, api_key: &str, id: &str) -> Result<ServerInfo> {
        debug!(key = %mask_key(api_key), id, "fetching server info");

        let endpoint = Endpoint::ServerInfo { id: id.to_string() };
        let response: ServerInfoResponse = self
            .get(&endpoint, &[("access_key", api_key), ("server_id", id)])
            .await?;
        Ok(response.server)
    }
}
