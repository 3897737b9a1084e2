//! Evaluation Engine
//!
//! One routine evaluates any label space: build the matrix, per-class
//! metrics and averages, then binary rates for two-label spaces and
//! macro-F1 for larger ones.

use serde::Serialize;

use super::matrix::ConfusionMatrix;
use super::metrics::{
    class_metrics, macro_average, weighted_average, AverageMetrics, BinaryRates, ClassMetrics,
};
use crate::logic::alert::{canonical_label_text, canonical_priority_text, AlertRecord, Priority};

// ===== LABEL SPACES =====

pub const CLASSIFICATION_LABELS: [&str; 2] = ["FP", "TP"];
pub const PRIORITY_LABELS: [&str; 4] = ["Critical", "High", "Medium", "Low"];
pub const HIGH_CRITICAL_LABELS: [&str; 2] = ["Other", "HC"];

/// A named label set plus how to read truth and prediction off a record
#[derive(Clone, Copy)]
pub struct LabelSpace {
    pub name: &'static str,
    pub labels: &'static [&'static str],
    pub truth: fn(&AlertRecord) -> String,
    pub prediction: fn(&AlertRecord) -> String,
}

impl LabelSpace {
    pub fn classification() -> Self {
        Self {
            name: "classification",
            labels: &CLASSIFICATION_LABELS,
            truth: |r| canonical_label_text(r.label.as_str()),
            prediction: |r| canonical_label_text(r.oracle_classification_text()),
        }
    }

    pub fn priority() -> Self {
        Self {
            name: "priority",
            labels: &PRIORITY_LABELS,
            truth: |r| canonical_priority_text(r.rule_priority.as_str()),
            prediction: |r| canonical_priority_text(r.oracle_priority_text()),
        }
    }

    /// High+Critical vs everything else
    pub fn high_critical() -> Self {
        Self {
            name: "high_critical",
            labels: &HIGH_CRITICAL_LABELS,
            truth: |r| high_critical_bucket(r.rule_priority.as_str()),
            prediction: |r| high_critical_bucket(r.oracle_priority_text()),
        }
    }
}

/// `HC` for High/Critical, `Other` for anything else (Missing and Error included)
pub fn high_critical_bucket(priority: &str) -> String {
    let hc = Priority::parse(&canonical_priority_text(priority))
        .map(|p| p.is_high_or_critical())
        .unwrap_or(false);
    let bucket = if hc { "HC" } else { "Other" };
    bucket.to_string()
}

// ===== REPORTS =====

#[derive(Debug, Clone, Serialize)]
pub struct SpaceReport {
    pub name: String,
    pub labels: Vec<String>,
    pub confusion_matrix: ConfusionMatrix,
    pub per_class: Vec<ClassMetrics>,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    /// Pairs counted in the matrix
    pub evaluated: u64,
    /// Pairs with truth or prediction outside the label set
    pub excluded: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<BinaryRates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macro_f1: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub total_records: usize,
    pub classification: SpaceReport,
    pub priority: SpaceReport,
    pub high_critical: SpaceReport,
}

/// Evaluate one label space over a batch
pub fn evaluate_space(space: &LabelSpace, records: &[AlertRecord]) -> SpaceReport {
    let owned: Vec<(String, String)> = records
        .iter()
        .map(|r| ((space.truth)(r), (space.prediction)(r)))
        .collect();
    let pairs: Vec<(&str, &str)> = owned.iter().map(|(t, p)| (t.as_str(), p.as_str())).collect();

    let matrix = ConfusionMatrix::build(space.labels, pairs.iter().copied());
    let per_class = class_metrics(space.labels, pairs.iter().copied());
    let macro_avg = macro_average(&per_class);
    let weighted_avg = weighted_average(&per_class);

    let evaluated = matrix.total();
    let excluded = pairs.len() as u64 - evaluated;
    if excluded > 0 {
        log::debug!("{}: {} pairs outside the label set", space.name, excluded);
    }

    let rates = matrix.binary_counts().map(|counts| BinaryRates::from_counts(&counts));
    let macro_f1 = (space.labels.len() > 2).then_some(macro_avg.f1);

    SpaceReport {
        name: space.name.to_string(),
        labels: space.labels.iter().map(|l| l.to_string()).collect(),
        confusion_matrix: matrix,
        per_class,
        macro_avg,
        weighted_avg,
        evaluated,
        excluded,
        rates,
        macro_f1,
    }
}

/// Evaluate a reconciled batch over all three label spaces
pub fn evaluate(records: &[AlertRecord]) -> EvaluationReport {
    let report = EvaluationReport {
        total_records: records.len(),
        classification: evaluate_space(&LabelSpace::classification(), records),
        priority: evaluate_space(&LabelSpace::priority(), records),
        high_critical: evaluate_space(&LabelSpace::high_critical(), records),
    };

    log::info!(
        "Evaluated {} records (classification {}, priority {}, high/critical {})",
        report.total_records,
        report.classification.evaluated,
        report.priority.evaluated,
        report.high_critical.evaluated
    );

    report
}
