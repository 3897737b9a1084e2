//! Raw Alert Ingestion
//!
//! Raw search-export lines -> deduplicated `AlertRecord`s with ground truth.
//! Per-line problems are collected, never fatal to the batch.

use serde::Serialize;
use serde_json::Value;

use super::dedup::{strip_presentation_fields, Deduplicator};
use super::severity::parse_rule_level;
use super::types::{AlertRecord, Label};
use crate::constants::MISSING;
use crate::logic::error::{RejectedLine, TriageResult};

/// Result of ingesting one raw batch
#[derive(Debug, Default, Serialize)]
pub struct IngestOutcome {
    pub records: Vec<AlertRecord>,
    /// Ids discarded as repeats, in encounter order
    pub duplicates: Vec<String>,
    /// Lines skipped as malformed or with a non-numeric rule level
    pub rejected: Vec<RejectedLine>,
}

/// Ingest numbered raw lines, assigning `label` as ground truth to every record
pub fn ingest_raw_alerts<I>(lines: I, label: Label) -> IngestOutcome
where
    I: IntoIterator<Item = (usize, String)>,
{
    let mut dedup = Deduplicator::new();
    let mut outcome = IngestOutcome::default();

    for (line_no, raw) in lines {
        let alert: Value = match serde_json::from_str(raw.trim()) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Skipping malformed line {}: {}", line_no, excerpt(&raw));
                outcome.rejected.push(RejectedLine::new(line_no, e.to_string(), &raw));
                continue;
            }
        };

        let id = match alert_id(&alert) {
            Some(id) => id,
            None => {
                log::warn!("Skipping line {} without _id: {}", line_no, excerpt(&raw));
                outcome.rejected.push(RejectedLine::new(line_no, "missing _id", &raw));
                continue;
            }
        };

        if !dedup.admit(&id) {
            log::debug!("Duplicate alert id {} at line {}", id, line_no);
            continue;
        }

        match build_record(id, alert, label) {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                log::warn!("Rejecting line {}: {}", line_no, e);
                outcome.rejected.push(RejectedLine::new(line_no, e.to_string(), &raw));
            }
        }
    }

    outcome.duplicates = dedup.into_duplicates();

    log::info!(
        "Ingested {} alerts as {} ({} duplicates, {} rejected)",
        outcome.records.len(),
        label,
        outcome.duplicates.len(),
        outcome.rejected.len()
    );

    outcome
}

/// Build one record from a parsed raw alert whose id was already admitted
pub fn build_record(id: String, mut alert: Value, label: Label) -> TriageResult<AlertRecord> {
    let rule = alert.get("_source").and_then(|s| s.get("rule"));
    let rule_level = parse_rule_level(rule.and_then(|r| r.get("level")))?;
    let description = rule
        .and_then(|r| r.get("description"))
        .and_then(Value::as_str)
        .unwrap_or(MISSING)
        .to_string();

    strip_presentation_fields(&mut alert);

    Ok(AlertRecord::new(id, description, label, rule_level, alert))
}

/// `_id` as text; numeric ids are accepted and stringified
fn alert_id(alert: &Value) -> Option<String> {
    match alert.get("_id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn excerpt(raw: &str) -> String {
    let head: String = raw.chars().take(100).collect();
    if head.len() < raw.len() {
        format!("{}...", head)
    } else {
        head
    }
}
