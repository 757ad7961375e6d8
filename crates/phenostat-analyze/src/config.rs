//! Configuration for the analysis job
//!
//! All settings come from the environment; the job takes no functional CLI
//! flags. Configuration problems are reported before any network activity.

use crate::error::{AnalyzeError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default shard count when CONCURRENCY is not set.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default timeout for HTTP requests in seconds.
/// Can be overridden via PHENOSTAT_HTTP_TIMEOUT_SECS environment variable.
/// Generous, to accommodate large archive downloads.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Analysis run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base address of the remote data gateway
    pub server_url: String,

    /// Identity used to request a bearer token
    pub email: String,

    /// Number of shards the location list is split into; one worker per
    /// non-empty shard
    pub concurrency: usize,

    /// Per-request HTTP timeout in seconds
    pub http_timeout_secs: u64,
}

impl Config {
    /// Create a config with default concurrency and timeout
    pub fn new(server_url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            email: email.into(),
            concurrency: DEFAULT_CONCURRENCY,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// Load config from environment variables
    ///
    /// - `SERVER_URL` (required): gateway base address
    /// - `EMAIL` (required): identity for token acquisition
    /// - `CONCURRENCY` (optional): positive integer shard count
    /// - `PHENOSTAT_HTTP_TIMEOUT_SECS` (optional): request timeout override
    pub fn from_env() -> Result<Self> {
        let server_url = std::env::var("SERVER_URL")
            .map_err(|_| AnalyzeError::config("SERVER_URL is not set"))?;

        let email =
            std::env::var("EMAIL").map_err(|_| AnalyzeError::config("EMAIL is not set"))?;

        let concurrency = match std::env::var("CONCURRENCY") {
            Ok(raw) => Self::parse_concurrency(&raw)?,
            Err(_) => DEFAULT_CONCURRENCY,
        };

        let http_timeout_secs = std::env::var("PHENOSTAT_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            server_url,
            email,
            concurrency,
            http_timeout_secs,
        })
    }

    fn parse_concurrency(raw: &str) -> Result<usize> {
        let concurrency: usize = raw.parse().map_err(|_| {
            AnalyzeError::config(format!(
                "CONCURRENCY must be a positive integer, got '{}'",
                raw
            ))
        })?;

        if concurrency == 0 {
            return Err(AnalyzeError::config(
                "CONCURRENCY must be at least 1".to_string(),
            ));
        }

        Ok(concurrency)
    }

    /// Get the gateway base URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Get the configured shard count
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Set the shard count
    pub fn set_concurrency(&mut self, concurrency: usize) {
        self.concurrency = concurrency;
    }
}
