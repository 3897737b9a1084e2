//! Batch Deduplication & Payload Stripping
//!
//! One `Deduplicator` per batch run - created, used, dropped. There is no
//! seen-set that outlives the batch.

use std::collections::HashSet;

use serde_json::Value;

use super::types::AlertRecord;

/// Annotation added by the search UI, never part of the alert itself
const HIGHLIGHT_FIELD: &str = "highlight";

#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    duplicates: Vec<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` on first sighting of `id`. Later sightings are logged to the
    /// duplicate list and return `false`.
    pub fn admit(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            self.duplicates.push(id.to_string());
            false
        } else {
            self.seen.insert(id.to_string());
            true
        }
    }

    /// Keep the first record per id, order preserved
    pub fn filter(&mut self, records: Vec<AlertRecord>) -> Vec<AlertRecord> {
        records
            .into_iter()
            .filter(|record| self.admit(&record.id))
            .collect()
    }

    /// Discarded occurrences, in encounter order
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    pub fn into_duplicates(self) -> Vec<String> {
        self.duplicates
    }
}

/// Dedup a whole batch with a fresh instance
pub fn dedup_records(records: Vec<AlertRecord>) -> (Vec<AlertRecord>, Vec<String>) {
    let mut dedup = Deduplicator::new();
    let kept = dedup.filter(records);
    (kept, dedup.into_duplicates())
}

/// Remove fields that leak ground truth or only exist for display:
/// the top-level `highlight` annotation and `_source.rule.level`.
pub fn strip_presentation_fields(payload: &mut Value) {
    if let Some(obj) = payload.as_object_mut() {
        obj.remove(HIGHLIGHT_FIELD);
    }

    if let Some(rule) = payload
        .get_mut("_source")
        .and_then(|source| source.get_mut("rule"))
        .and_then(Value::as_object_mut)
    {
        rule.remove("level");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::types::Label;
    use serde_json::json;

    fn record(id: &str, description: &str) -> AlertRecord {
        AlertRecord::new(id, description, Label::Fp, 3, json!({}))
    }

    #[test]
    fn test_first_occurrence_wins() {
        let batch = vec![
            record("a", "first a"),
            record("b", "only b"),
            record("a", "second a"),
            record("c", "only c"),
            record("a", "third a"),
            record("b", "second b"),
        ];

        let (kept, duplicates) = dedup_records(batch);

        let ids: Vec<_> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(kept[0].description, "first a");
        assert_eq!(duplicates, vec!["a", "a", "b"]);
    }

    #[test]
    fn test_fresh_instance_has_no_history() {
        let mut first = Deduplicator::new();
        assert!(first.admit("x"));
        assert!(!first.admit("x"));
        assert_eq!(first.unique_count(), 1);

        let mut second = Deduplicator::new();
        assert!(second.admit("x"));
        assert!(second.duplicates().is_empty());
    }

    #[test]
    fn test_strip_removes_highlight_and_rule_level() {
        let mut payload = json!({
            "_id": "a",
            "highlight": {"rule.description": ["<em>ssh</em>"]},
            "_source": {
                "rule": {"level": 12, "description": "sshd: brute force", "id": "5712"},
                "agent": {"name": "web-01"}
            }
        });

        strip_presentation_fields(&mut payload);

        assert!(payload.get("highlight").is_none());
        assert!(payload["_source"]["rule"].get("level").is_none());
        assert_eq!(payload["_source"]["rule"]["id"], json!("5712"));
        assert_eq!(payload["_source"]["agent"]["name"], json!("web-01"));
    }

    #[test]
    fn test_strip_tolerates_odd_shapes() {
        let mut not_object = json!(["x"]);
        strip_presentation_fields(&mut not_object);
        assert_eq!(not_object, json!(["x"]));

        let mut no_rule = json!({"_source": {"data": 1}});
        strip_presentation_fields(&mut no_rule);
        assert_eq!(no_rule, json!({"_source": {"data": 1}}));
    }
}
