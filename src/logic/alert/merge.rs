//! Batch Merging
//!
//! Combines a TP batch and an FP batch into one shuffled working batch, so
//! the oracle never sees labels in long runs.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::dedup::Deduplicator;
use super::types::AlertRecord;

#[derive(Debug, Default, Serialize)]
pub struct MergeOutcome {
    pub records: Vec<AlertRecord>,
    /// Ids present in both inputs; the copy from the first input is kept
    pub duplicates: Vec<String>,
}

/// Concatenate, dedup across both inputs, then shuffle.
///
/// With a seed the resulting order is reproducible.
pub fn merge_batches(
    first: Vec<AlertRecord>,
    second: Vec<AlertRecord>,
    seed: Option<u64>,
) -> MergeOutcome {
    let mut dedup = Deduplicator::new();
    let mut records = dedup.filter(first.into_iter().chain(second).collect());

    match seed {
        Some(seed) => records.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => records.shuffle(&mut rand::thread_rng()),
    }

    let duplicates = dedup.into_duplicates();
    if !duplicates.is_empty() {
        log::warn!("Merge dropped {} records with repeated ids", duplicates.len());
    }
    log::info!("Merged batch holds {} records", records.len());

    MergeOutcome { records, duplicates }
}
