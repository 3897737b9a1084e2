use crate::logic::alert::{canonical_label_text, canonical_priority_text, AlertRecord};

/// Derive the oracle fields and strict match flags from the stored response.
///
/// Classification: trimmed, upper-cased. Priority: trimmed, capitalized.
/// Justification: as returned. No-op for records without a response.
pub fn apply_response(record: &mut AlertRecord) {
    let Some(response) = record.oracle_response.as_ref() else {
        return;
    };

    let classification = canonical_label_text(&response.classification);
    let priority = canonical_priority_text(&response.priority);
    let justification = response.justification.clone();

    record.oracle_classification = Some(classification);
    record.oracle_priority = Some(priority);
    record.oracle_justification = Some(justification);

    // Strict equality; near-misses are the reconciler's job
    record.classification_agrees = Some(record.classification_matches());
    record.priority_agrees = Some(record.priority_matches());
}
