//! Evaluation Module
//!
//! Scores oracle answers against ground truth over three label spaces:
//! - classification: `FP`, `TP` (with TPR/FPR/FNR)
//! - priority: `Critical`, `High`, `Medium`, `Low` (with macro-F1)
//! - high/critical: `Other`, `HC` (with TPR/FPR/FNR)
//!
//! ## Structure
//! - `matrix`: confusion matrix over a fixed label order
//! - `metrics`: per-class metrics, averages and binary rates
//! - `engine`: label spaces and the single evaluation routine
//! - `report`: text rendering

pub mod matrix;
pub mod metrics;
pub mod engine;
pub mod report;


pub use matrix::{BinaryCounts, ConfusionMatrix};
pub use metrics::{AverageMetrics, BinaryRates, ClassMetrics};
pub use engine::{
    evaluate, evaluate_space, high_critical_bucket, EvaluationReport, LabelSpace, SpaceReport,
    CLASSIFICATION_LABELS, HIGH_CRITICAL_LABELS, PRIORITY_LABELS,
};
