//! Work partitioning
//!
//! Splits the discovered location list into at most `shard_count` contiguous
//! shards, one worker per shard.

use phenostat_common::types::DataLocation;

/// Partition locations into contiguous, non-overlapping, non-empty shards.
///
/// Chunk size is `ceil(len / shard_count)`, so the result holds at most
/// `shard_count` shards, every location appears exactly once, and an empty
/// input yields zero shards. `shard_count` is validated to be positive at
/// configuration time.
pub fn partition(locations: Vec<DataLocation>, shard_count: usize) -> Vec<Vec<DataLocation>> {
    debug_assert!(shard_count > 0, "shard_count must be positive");

    if locations.is_empty() || shard_count == 0 {
        return Vec::new();
    }

    let chunk_size = locations.len().div_ceil(shard_count);
    locations
        .chunks(chunk_size)
        .map(<[DataLocation]>::to_vec)
        .collect()
}
