//! Alert Module
//!
//! Ground truth side of the pipeline: record types, rule level -> priority
//! mapping, per-batch dedup, raw ingestion and batch merging.
//!
//! ## Structure
//! - `types`: AlertRecord, Label, Priority, OracleResponse
//! - `severity`: rule level mapping (pure)
//! - `dedup`: Deduplicator + payload stripping
//! - `ingest`: raw lines -> records
//! - `merge`: TP + FP batches -> one shuffled batch

pub mod types;
pub mod severity;
pub mod dedup;
pub mod ingest;
pub mod merge;

pub use types::{
    AlertRecord,
    Label,
    Priority,
    OracleResponse,
    capitalize,
    canonical_label_text,
    canonical_priority_text,
};

pub use severity::{map_rule_level, parse_rule_level, ABSENT_RULE_LEVEL};
pub use dedup::{Deduplicator, dedup_records, strip_presentation_fields};
pub use ingest::{ingest_raw_alerts, IngestOutcome};
pub use merge::{merge_batches, MergeOutcome};
