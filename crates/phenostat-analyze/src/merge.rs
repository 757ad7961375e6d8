//! Merge-reduce
//!
//! Runs strictly after every shard worker has returned. Two steps: combine
//! shard tallies by code, then collapse the code-level view into the
//! description-keyed reporting shape.

use phenostat_common::types::{MergedCount, PartialCount, Statistics};
use std::collections::BTreeMap;

/// Separator used when joining a code's descriptions into a reporting key.
const DESCRIPTION_JOIN: &str = ", ";

/// Combine shard tallies by code.
///
/// Counts sum commutatively, so shard order never changes the totals. Each
/// code keeps every distinct description it was seen with, in
/// first-encounter order across the fold, which keeps the collapsed keys
/// stable between runs.
pub fn merge_counts(shard_results: Vec<PartialCount>) -> BTreeMap<String, MergedCount> {
    let mut merged: BTreeMap<String, MergedCount> = BTreeMap::new();

    for partial in shard_results {
        for (code, tally) in partial.into_inner() {
            merged.entry(code).or_default().absorb(&tally);
        }
    }

    merged
}

/// Collapse the code-level merge into the reported statistics.
///
/// The reporting key is the code's joined description text, not the code:
/// distinct codes that collapse to the same joined string are summed under
/// one key. That keying is deliberate; see DESIGN.md.
pub fn collapse(merged: BTreeMap<String, MergedCount>) -> Statistics {
    let mut statistics = Statistics::new();
    for entry in merged.into_values() {
        statistics.add(entry.descriptions.join(DESCRIPTION_JOIN), entry.count);
    }
    statistics
}
