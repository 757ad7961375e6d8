//! Run orchestrator
//!
//! Drives one full analysis run: sequential discovery, bounded fan-out of
//! isolated shard workers, a merge that only starts once every worker has
//! completed, and the final submission. There is no partial merging while
//! workers are still running, and no timeout beyond the per-request HTTP
//! timeout, so a hung fetch stalls the run.

use crate::api::GatewayClient;
use crate::config::Config;
use crate::error::{AnalyzeError, Result};
use crate::worker::ShardWorker;
use crate::{discovery, merge, partition};
use phenostat_common::types::{PartialCount, Statistics};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info};

/// Perform one analysis run and return the submitted statistics.
pub async fn run(config: Config) -> Result<Statistics> {
    info!(
        server_url = %config.server_url,
        concurrency = config.concurrency,
        "Starting phenotype analysis run"
    );

    let client = Arc::new(GatewayClient::new(&config)?);

    let locations = discovery::discover_all(&client).await?;
    let shards = partition::partition(locations, config.concurrency);
    info!(shards = shards.len(), "Dispatching shard workers");

    let mut handles = Vec::with_capacity(shards.len());
    for (shard_index, shard) in shards.into_iter().enumerate() {
        let worker = ShardWorker::new(shard_index, Arc::clone(&client));
        handles.push(tokio::spawn(worker.run(shard)));
    }

    // Merge waits for every worker unconditionally.
    let outcomes = futures::future::join_all(handles).await;
    let shard_results = collect_shard_results(outcomes)?;

    let statistics = merge::collapse(merge::merge_counts(shard_results));
    info!(keys = statistics.len(), "Merge complete, submitting statistics");

    client.send_statistics(&statistics).await?;
    info!("Statistics submitted");

    Ok(statistics)
}

/// Separate the two possible worker outcomes: a returned tally, or a task
/// that panicked or was cancelled and never produced one.
///
/// The second case invalidates the aggregate, so it fails the whole run
/// before anything is merged or submitted.
fn collect_shard_results(
    outcomes: Vec<std::result::Result<PartialCount, JoinError>>,
) -> Result<Vec<PartialCount>> {
    let mut shard_results = Vec::with_capacity(outcomes.len());
    for (shard_index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(counts) => shard_results.push(counts),
            Err(err) => {
                error!(shard = shard_index, error = %err, "Shard worker never returned a result");
                return Err(AnalyzeError::worker(format!(
                    "shard {} worker terminated without a result: {}",
                    shard_index, err
                )));
            },
        }
    }
    Ok(shard_results)
}
