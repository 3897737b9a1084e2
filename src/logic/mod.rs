//! Logic Module - Pipeline Stages & Engines
//!
//! Alert ingestion, oracle orchestration, reconciliation and evaluation.
//!
//! ## Architecture
//! - `alert/` - Record types, severity mapping, dedup, ingest, merge
//! - `dataset/` - JSONL/JSON/CSV files on disk
//! - `oracle/` - Classifier oracle trait + HTTP adapter
//! - `orchestrator/` - Resumable classification pass
//! - `reconcile/` - Normalization and match repair
//! - `evaluation/` - Confusion matrices, metrics, rates
//! - `pipeline` - Stage functions used by the CLI

pub mod error;
pub mod config;

// Pipeline modules
pub mod alert;
pub mod dataset;
pub mod oracle;
pub mod orchestrator;
pub mod reconcile;
pub mod evaluation;
pub mod pipeline;

pub use config::EvalConfig;
pub use error::{RejectedLine, TriageError, TriageResult};
