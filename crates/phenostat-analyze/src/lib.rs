//! Phenostat Analyze Library
//!
//! Batch analysis job that aggregates phenotype statistics from remotely
//! hosted patient-data archives.
//!
//! # Overview
//!
//! One invocation performs one full run:
//!
//! - **Address Discovery**: walk the gateway's paginated listing to collect
//!   every archive location (`discovery`)
//! - **Work Partitioning**: slice the location list into contiguous shards
//!   (`partition`)
//! - **Shard Workers**: isolated tasks that fetch, decompress, and tally each
//!   archive in their shard (`worker`, `decode`)
//! - **Merge-Reduce**: combine per-shard tallies into the reported aggregate
//!   (`merge`)
//! - **Reporting**: submit the aggregate back to the gateway (`api`)

pub mod analyze;
pub mod api;
pub mod config;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod partition;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::{AnalyzeError, Result};
