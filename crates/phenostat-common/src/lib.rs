//! Phenostat Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and logging setup for the Phenostat workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all Phenostat workspace
//! members:
//!
//! - **Logging**: Centralized tracing configuration and initialization
//! - **Types**: The analysis data model (locations, records, tallies)
//!
//! # Example
//!
//! ```no_run
//! use phenostat_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!
//!     info!("Analysis run starting");
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;

// Re-export commonly used types
pub use types::{DataLocation, PartialCount, Statistics};
