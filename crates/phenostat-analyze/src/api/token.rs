//! Bearer token provider
//!
//! One provider is constructed at run start and shared (behind the gateway
//! client) by every component that makes authenticated calls: discovery
//! pages, archive fetches, and the final report. The first fetch is
//! single-flighted through a `OnceCell`, so concurrent first use performs
//! exactly one token request; afterwards the token is cached for the whole
//! run.

use crate::api::endpoints;
use crate::api::types::TokenResponse;
use crate::error::{AnalyzeError, Result};
use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::debug;

/// Process-wide bearer token provider
pub struct TokenProvider {
    client: Client,
    base_url: String,
    email: String,
    token: OnceCell<String>,
}

impl TokenProvider {
    /// Create a provider; no token is fetched until first use
    pub fn new(client: Client, base_url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            email: email.into(),
            token: OnceCell::new(),
        }
    }

    /// Get the bearer token, fetching it on first use
    ///
    /// Any failure here is an authentication failure, which is fatal for
    /// the run.
    pub async fn bearer_token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                debug!(email = %self.email, "Requesting bearer token");

                let url = endpoints::token_url(&self.base_url, &self.email);
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| AnalyzeError::auth(format!("token request failed: {}", e)))?
                    .error_for_status()
                    .map_err(|e| AnalyzeError::auth(format!("token request rejected: {}", e)))?;

                let body: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| AnalyzeError::auth(format!("invalid token response: {}", e)))?;

                Ok::<String, AnalyzeError>(body.bearer_token)
            })
            .await?;

        Ok(token.as_str())
    }
}
