//! Match Reconciler
//!
//! Input: classified records. Output: the same records with repaired
//! classifications, recomputed match flags and sanitized justifications,
//! plus an audit of priorities outside the vocabulary.

use serde::Serialize;

use super::normalize::{is_allowed_priority, normalize_classification, sanitize_justification};
use crate::logic::alert::AlertRecord;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub records: usize,
    /// Raw mismatches that turned out to be formatting only
    pub repaired_classifications: usize,
    /// Mismatches left after normalization
    pub classification_disagreements: usize,
    /// Ids whose oracle priority is not Low/Medium/High/Critical
    pub bad_priorities: Vec<String>,
}

/// Reconcile a batch in place
pub fn reconcile(records: &mut [AlertRecord]) -> ReconcileReport {
    let mut report = ReconcileReport {
        records: records.len(),
        ..Default::default()
    };

    for record in records.iter_mut() {
        // Only raw disagreements are candidates for repair
        if record.classification_agrees == Some(false) {
            let normalized = normalize_classification(record.oracle_classification_text());
            record.oracle_classification = Some(normalized);

            let agrees = record.classification_matches();
            record.classification_agrees = Some(agrees);
            if agrees {
                report.repaired_classifications += 1;
            } else {
                report.classification_disagreements += 1;
            }
        }

        // Recomputed from current fields, never carried over
        if record.oracle_priority.is_some() {
            let agrees = record.priority_matches();
            record.priority_agrees = Some(agrees);

            if !agrees && !is_allowed_priority(record.oracle_priority_text()) {
                report.bad_priorities.push(record.id.clone());
            }
        }

        if let Some(justification) = record.oracle_justification.take() {
            record.oracle_justification = Some(sanitize_justification(&justification));
        }
    }

    log::info!(
        "Reconciled {} records: {} repaired, {} real disagreements, {} bad priorities",
        report.records,
        report.repaired_classifications,
        report.classification_disagreements,
        report.bad_priorities.len()
    );
    if !report.bad_priorities.is_empty() {
        log::warn!("Bad priorities: {:?}", report.bad_priorities);
    }

    report
}
