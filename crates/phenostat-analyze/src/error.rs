//! Error types for the analysis job
//!
//! Errors carry enough context to act on: what failed, and where to look.
//! Which errors abort the run and which are absorbed is decided at the call
//! site: per-location failures are caught inside the shard worker, per-page
//! failures inside discovery, everything else bubbles to the top.

use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalyzeError>;

/// Error type for the analysis job
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check the SERVER_URL, EMAIL and CONCURRENCY environment variables.")]
    Config(String),

    /// Bearer token acquisition failed; fatal for the run
    #[error("Authentication failed: {0}. Verify EMAIL and that the gateway token endpoint is reachable.")]
    Auth(String),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your connection and the gateway URL.")]
    Http(#[from] reqwest::Error),

    /// Archive could not be opened or read
    #[error("Archive error: {0}")]
    Archive(String),

    /// Tabular data inside an archive entry is malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// CSV decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A worker task terminated without returning its tally; fatal for the run
    #[error("Worker failure: {0}")]
    Worker(String),

    /// JSON parsing failed
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// File system or stream I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyzeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create an archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a worker error
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }
}
