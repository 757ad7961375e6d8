//! Shard worker
//!
//! One worker owns one shard of the location list and runs as an isolated
//! task: it shares no mutable state with the orchestrator or other workers,
//! and hands back its tally only through the task's return value.

use crate::api::ArchiveFetcher;
use crate::decode::{ArchiveDecoder, CsvRecordReader, RecordReader, ZipDecoder};
use crate::error::Result;
use phenostat_common::types::{ArchiveRecord, DataLocation, PartialCount};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Worker processing one shard of archive locations
pub struct ShardWorker<F: ArchiveFetcher> {
    worker_id: Uuid,
    shard_index: usize,
    fetcher: Arc<F>,
    decoder: Arc<dyn ArchiveDecoder>,
    reader: Arc<dyn RecordReader>,
}

impl<F: ArchiveFetcher> ShardWorker<F> {
    /// Create a worker with the production ZIP/CSV decoding stack
    pub fn new(shard_index: usize, fetcher: Arc<F>) -> Self {
        Self::with_capabilities(
            shard_index,
            fetcher,
            Arc::new(ZipDecoder),
            Arc::new(CsvRecordReader),
        )
    }

    /// Create a worker with explicit decoding capabilities (tests use fakes)
    pub fn with_capabilities(
        shard_index: usize,
        fetcher: Arc<F>,
        decoder: Arc<dyn ArchiveDecoder>,
        reader: Arc<dyn RecordReader>,
    ) -> Self {
        Self {
            worker_id: Uuid::new_v4(),
            shard_index,
            fetcher,
            decoder,
            reader,
        }
    }

    /// Process every location in the shard sequentially and return the tally.
    ///
    /// A failure on one location (fetch, decompress, or parse) is logged
    /// and that location is skipped; a single bad archive never aborts the
    /// shard. The worker always returns exactly one tally, covering the
    /// locations that succeeded.
    pub async fn run(self, locations: Vec<DataLocation>) -> PartialCount {
        info!(
            worker_id = %self.worker_id,
            shard = self.shard_index,
            locations = locations.len(),
            "Shard worker starting"
        );

        let mut counts = PartialCount::new();
        for location in &locations {
            match self.decode_location(location).await {
                Ok(records) => {
                    for record in records {
                        counts.record(&record.code, &record.description);
                    }
                },
                Err(err) => {
                    warn!(
                        worker_id = %self.worker_id,
                        location = %location,
                        error = %err,
                        "Skipping archive after processing failure"
                    );
                },
            }
        }

        info!(
            worker_id = %self.worker_id,
            shard = self.shard_index,
            codes = counts.len(),
            records = counts.total(),
            "Shard worker finished"
        );

        counts
    }

    /// Fetch and fully decode one location.
    ///
    /// All entries are parsed before anything is returned, so a malformed
    /// entry leaves no partial contribution from the location.
    async fn decode_location(&self, location: &DataLocation) -> Result<Vec<ArchiveRecord>> {
        let bytes = self.fetcher.fetch(&location.url).await?;
        let entries = self.decoder.entries(&bytes)?;

        let mut records = Vec::new();
        for entry in &entries {
            records.extend(self.reader.records(&entry.data)?);
        }
        Ok(records)
    }
}
