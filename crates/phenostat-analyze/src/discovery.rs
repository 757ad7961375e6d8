//! Address discovery
//!
//! Sequentially walks the gateway's paginated address listing before any
//! worker is spawned. The cursor starts at zero and each page supplies the
//! next one; the first end-of-pagination signal terminates the walk.

use crate::api::GatewayClient;
use crate::error::{AnalyzeError, Result};
use phenostat_common::types::DataLocation;
use tracing::{info, warn};

/// Collect every archive location the gateway knows about, in receipt order.
///
/// A transport or API failure on a page does not abort the run: discovery
/// stops and returns what it has, logged loudly because the run will then
/// under-report. Authentication failures are the exception: there is no
/// degraded mode without a token, so they propagate and end the run.
pub async fn discover_all(client: &GatewayClient) -> Result<Vec<DataLocation>> {
    let mut locations = Vec::new();
    let mut offset = 0u64;

    loop {
        match client.next_address(offset).await {
            Ok(Some(location)) => {
                offset = location.offset;
                locations.push(location);
            },
            Ok(None) => break,
            Err(err @ AnalyzeError::Auth(_)) => return Err(err),
            Err(err) => {
                warn!(
                    error = %err,
                    collected = locations.len(),
                    "Address discovery failed mid-pagination; continuing with a truncated location list"
                );
                break;
            },
        }
    }

    info!(locations = locations.len(), "Address discovery finished");
    Ok(locations)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

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

    async fn mount_page(mock_server: &MockServer, offset: u64, url: &str, next_offset: u64) {
        Mock::given(method("GET"))
            .and(path("/patients_data_address"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": url,
                "offset": next_offset,
                "link_expiration_timestamp_utc": "2026-01-01T00:00:00Z"
            })))
            .mount(mock_server)
            .await;
    }

    async fn mount_end(mock_server: &MockServer, offset: u64) {
        Mock::given(method("GET"))
            .and(path("/patients_data_address"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200))
            .mount(mock_server)
            .await;
    }

    fn client_for(mock_server: &MockServer) -> GatewayClient {
        GatewayClient::new(&Config::new(mock_server.uri(), "analyst@example.com")).unwrap()
    }

    #[tokio::test]
    async fn test_discovery_walks_pagination_in_order() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;
        mount_page(&mock_server, 0, "https://data.example.com/1.zip", 1).await;
        mount_page(&mock_server, 1, "https://data.example.com/2.zip", 2).await;
        mount_end(&mock_server, 2).await;

        let client = client_for(&mock_server);
        let locations = discover_all(&client).await.unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].url, "https://data.example.com/1.zip");
        assert_eq!(locations[1].url, "https://data.example.com/2.zip");
    }

    #[tokio::test]
    async fn test_immediate_end_yields_empty_list() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;
        mount_end(&mock_server, 0).await;

        let client = client_for(&mock_server);
        let locations = discover_all(&client).await.unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn test_page_failure_truncates_but_keeps_earlier_pages() {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;
        mount_page(&mock_server, 0, "https://data.example.com/1.zip", 1).await;

        Mock::given(method("GET"))
            .and(path("/patients_data_address"))
            .and(query_param("offset", "1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let locations = discover_all(&client).await.unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].url, "https://data.example.com/1.zip");
    }

    #[tokio::test]
    async fn test_auth_failure_is_fatal() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(matches!(
            discover_all(&client).await,
            Err(AnalyzeError::Auth(_))
        ));
    }
}
