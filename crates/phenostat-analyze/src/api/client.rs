//! HTTP client for the remote data gateway
//!
//! Wraps a single shared `reqwest::Client` and the run-wide token provider.
//! No operation retries: a failed page truncates discovery, a failed archive
//! skips a location, and a failed submission ends the run. Those policies
//! live at the call sites, not here.

use crate::api::endpoints;
use crate::api::types::PatientDataAddress;
use crate::api::TokenProvider;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use phenostat_common::types::{DataLocation, Statistics};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// API client for the remote data gateway
pub struct GatewayClient {
    client: Client,
    base_url: String,
    tokens: TokenProvider,
}

impl GatewayClient {
    /// Create a new gateway client from run configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let tokens = TokenProvider::new(
            client.clone(),
            config.server_url.clone(),
            config.email.clone(),
        );

        Ok(Self {
            client,
            base_url: config.server_url.clone(),
            tokens,
        })
    }

    /// Fetch the next address page
    ///
    /// Returns `Ok(None)` at end-of-pagination: an empty body, JSON `null`,
    /// or a page without a usable url/cursor.
    pub async fn next_address(&self, offset: u64) -> Result<Option<DataLocation>> {
        let token = self.tokens.bearer_token().await?;
        let url = endpoints::patients_data_address_url(&self.base_url, offset);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let page: Option<PatientDataAddress> = serde_json::from_slice(&bytes)?;
        Ok(page.and_then(PatientDataAddress::into_location))
    }

    /// Download raw archive bytes from a location
    ///
    /// The location is typically a presigned link outside the gateway's base
    /// address; it is fetched without the bearer header.
    pub async fn fetch_archive(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?.to_vec();
        debug!(url = %url, size = bytes.len(), "Fetched archive");
        Ok(bytes)
    }

    /// Submit the final aggregate; one authenticated POST, no retry
    pub async fn send_statistics(&self, statistics: &Statistics) -> Result<()> {
        let token = self.tokens.bearer_token().await?;
        let url = endpoints::statistics_url(&self.base_url);

        self.client
            .post(&url)
            .bearer_auth(token)
            .json(statistics)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Capability seam for the shard worker: fetch the raw bytes at a location.
///
/// Implemented by [`GatewayClient`] in production and by in-memory fakes in
/// worker tests.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl ArchiveFetcher for GatewayClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch_archive(url).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::AnalyzeError;
    use wiremock::matchers::{bearer_token, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_url: String) -> Config {
        Config::new(server_url, "analyst@example.com")
    }

    async fn mount_token(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "bearer_token": "test-token" })),
            )
            .mount(mock_server)
            .await;
    }

    #[test]
    fn test_client_creation() {
        let client = GatewayClient::new(&test_config("http://localhost:8000".to_string())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_next_address_carries_bearer_token() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/patients_data_address"))
            .and(query_param("offset", "0"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://data.example.com/archives/1.zip",
                "offset": 1,
                "link_expiration_timestamp_utc": "2026-01-01T00:00:00Z"
            })))
            .mount(&mock_server)
            .await;

        let client = GatewayClient::new(&test_config(mock_server.uri())).unwrap();
        let location = client.next_address(0).await.unwrap().unwrap();
        assert_eq!(location.url, "https://data.example.com/archives/1.zip");
        assert_eq!(location.offset, 1);
    }

    #[tokio::test]
    async fn test_next_address_empty_body_ends_pagination() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/patients_data_address"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = GatewayClient::new(&test_config(mock_server.uri())).unwrap();
        assert!(client.next_address(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_next_address_null_body_ends_pagination() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/patients_data_address"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
            .mount(&mock_server)
            .await;

        let client = GatewayClient::new(&test_config(mock_server.uri())).unwrap();
        assert!(client.next_address(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_statistics_posts_flat_map() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/statistics"))
            .and(bearer_token("test-token"))
            .and(wiremock::matchers::body_json(
                serde_json::json!({ "Flu": 2, "Cold": 1 }),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let statistics: Statistics = [("Flu".to_string(), 2), ("Cold".to_string(), 1)]
            .into_iter()
            .collect();

        let client = GatewayClient::new(&test_config(mock_server.uri())).unwrap();
        client.send_statistics(&statistics).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_statistics_failure_propagates() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/statistics"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = GatewayClient::new(&test_config(mock_server.uri())).unwrap();
        let result = client.send_statistics(&Statistics::new()).await;
        assert!(matches!(result, Err(AnalyzeError::Http(_))));
    }
}
