//! Common types used across Phenostat
//!
//! The data model of the analysis pipeline: discovered archive locations,
//! parsed records, per-worker tallies, and the final reported statistics.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single archive location returned by the gateway's paginated listing.
///
/// Immutable once created: produced one page at a time by address discovery
/// and consumed exactly once by the work partitioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLocation {
    /// Where the archive bytes live. Not necessarily under the gateway's
    /// base address (presigned links are common).
    pub url: String,

    /// The pagination cursor to use for the next listing request.
    pub offset: u64,
}

impl DataLocation {
    pub fn new(url: impl Into<String>, offset: u64) -> Self {
        Self {
            url: url.into(),
            offset,
        }
    }
}

impl std::fmt::Display for DataLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (offset {})", self.url, self.offset)
    }
}

/// A single parsed row from a tabular file inside an archive.
///
/// Transient: exists only while a shard worker folds it into its tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// Categorical phenotype code.
    pub code: String,

    /// Human-readable label for the code.
    pub description: String,
}

/// Running tally for one phenotype code inside a [`PartialCount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTally {
    /// The description observed on first encounter of the code within the
    /// owning worker. Later encounters with a different description are not
    /// reconciled at this layer.
    pub description: String,

    /// Number of records with this code seen by the owning worker.
    pub count: u64,
}

/// One shard worker's local code tally.
///
/// Owned exclusively by a single worker for the duration of its run and
/// emitted once when the worker finishes its shard. Never shared between
/// workers, so no locking is involved in the counting loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialCount {
    counts: HashMap<String, CodeTally>,
}

impl PartialCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the tally.
    ///
    /// The first encounter of a code fixes its description; every encounter
    /// increments its count by one. No deduplication happens here: the same
    /// record seen twice counts twice.
    pub fn record(&mut self, code: &str, description: &str) {
        let tally = self
            .counts
            .entry(code.to_string())
            .or_insert_with(|| CodeTally {
                description: description.to_string(),
                count: 0,
            });
        tally.count += 1;
    }

    /// Tally for a single code, if present.
    pub fn get(&self, code: &str) -> Option<&CodeTally> {
        self.counts.get(code)
    }

    /// Number of distinct codes seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all per-code counts (total records folded in).
    pub fn total(&self) -> u64 {
        self.counts.values().map(|t| t.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CodeTally)> {
        self.counts.iter()
    }

    pub fn into_inner(self) -> HashMap<String, CodeTally> {
        self.counts
    }
}

impl FromIterator<(String, CodeTally)> for PartialCount {
    fn from_iter<I: IntoIterator<Item = (String, CodeTally)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Merge intermediate for one phenotype code across all shards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedCount {
    /// Every distinct description observed for the code, in first-encounter
    /// order across the fold. Order-preserving so the collapsed reporting
    /// key is stable across runs.
    pub descriptions: Vec<String>,

    /// Total count for the code across all shards.
    pub count: u64,
}

impl MergedCount {
    /// Add a shard-level tally for this code.
    pub fn absorb(&mut self, tally: &CodeTally) {
        if !self.descriptions.contains(&tally.description) {
            self.descriptions.push(tally.description.clone());
        }
        self.count += tally.count;
    }
}

/// The final aggregate reported to the gateway.
///
/// Keyed by joined description text, not by code: distinct codes whose
/// descriptions collapse to the same string are summed under one key.
/// Serializes as a flat JSON map, which is the `POST /statistics` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics {
    totals: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a count under a reporting key, summing with any existing entry.
    pub fn add(&mut self, key: impl Into<String>, count: u64) {
        *self.totals.entry(key.into()).or_insert(0) += count;
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.totals.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.totals.iter()
    }
}

impl FromIterator<(String, u64)> for Statistics {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut stats = Self::new();
        for (key, count) in iter {
            stats.add(key, count);
        }
        stats
    }
}
