use super::*;
use crate::logic::alert::{Label, Priority};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers by description; unknown descriptions fail like a dropped connection
struct ScriptedOracle {
    answers: HashMap<String, OracleResponse>,
    delays_ms: HashMap<String, u64>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl ScriptedOracle {
    fn new(answers: &[(&str, &str, &str)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(d, c, p)| (d.to_string(), OracleResponse::new(*c, *p, format!("because {}", d))))
                .collect(),
            delays_ms: HashMap::new(),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, description: &str, ms: u64) -> Self {
        self.delays_ms.insert(description.to_string(), ms);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierOracle for ScriptedOracle {
    async fn classify(&self, description: &str, _payload: &Value) -> Result<OracleResponse, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ms) = self.delays_ms.get(description) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(description)
            .cloned()
            .ok_or_else(|| OracleError::NetworkError("connection reset".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn record(id: &str, description: &str, label: Label, level: i64) -> AlertRecord {
    AlertRecord::new(id, description, label, level, json!({"_id": id}))
}

fn batch() -> Vec<AlertRecord> {
    vec![
        record("1", "brute force", Label::Tp, 12),
        record("2", "scanner", Label::Fp, 3),
        record("3", "unreachable", Label::Tp, 15),
    ]
}

fn oracle() -> Arc<ScriptedOracle> {
    Arc::new(ScriptedOracle::new(&[
        ("brute force", " tp ", "HIGH"),
        ("scanner", "TRUE POSITIVE", "low "),
    ]))
}

#[tokio::test]
async fn test_fields_are_extracted_and_strictly_matched() {
    let oracle = oracle();
    let mut records = batch();

    let stats = ClassificationOrchestrator::new(oracle.clone()).run(&mut records).await;

    let first = &records[0];
    assert_eq!(first.oracle_classification.as_deref(), Some("TP"));
    assert_eq!(first.oracle_priority.as_deref(), Some("High"));
    assert_eq!(first.oracle_justification.as_deref(), Some("because brute force"));
    assert_eq!(first.classification_agrees, Some(true));
    assert_eq!(first.priority_agrees, Some(true));

    // Raw text mismatch stays a mismatch at this stage
    let second = &records[1];
    assert_eq!(second.oracle_classification.as_deref(), Some("TRUE POSITIVE"));
    assert_eq!(second.classification_agrees, Some(false));
    assert_eq!(second.priority_agrees, Some(true));

    assert_eq!(stats.oracle_calls, 3);
    assert_eq!(stats.processed, 3);
}

#[tokio::test]
async fn test_failure_becomes_sentinel_and_batch_continues() {
    let oracle = oracle();
    let mut records = batch();

    let stats = ClassificationOrchestrator::new(oracle.clone()).run(&mut records).await;

    let failed = &records[2];
    assert!(failed.oracle_response.as_ref().unwrap().is_error_sentinel());
    assert_eq!(failed.oracle_classification.as_deref(), Some("ERROR"));
    assert_eq!(failed.oracle_priority.as_deref(), Some("Error"));
    assert_eq!(failed.oracle_justification.as_deref(), Some("ERROR"));
    assert_eq!(failed.classification_agrees, Some(false));
    assert_eq!(failed.rule_priority, Priority::Critical);
    assert_eq!(stats.failures, 1);
}

#[tokio::test]
async fn test_second_run_makes_no_calls_and_changes_nothing() {
    let oracle = oracle();
    let orchestrator = ClassificationOrchestrator::new(oracle.clone());
    let mut records = batch();

    orchestrator.run(&mut records).await;
    let first_pass = serde_json::to_string(&records).unwrap();
    assert_eq!(oracle.calls(), 3);

    let stats = orchestrator.run(&mut records).await;

    assert_eq!(oracle.calls(), 3);
    assert_eq!(stats.oracle_calls, 0);
    assert_eq!(stats.resumed, 3);
    assert_eq!(serde_json::to_string(&records).unwrap(), first_pass);
}

#[tokio::test]
async fn test_partial_batch_resumes_only_pending() {
    let oracle = oracle();
    let mut records = batch();
    records[0].oracle_response = Some(OracleResponse::new("FP", "Low", "stored earlier"));

    let stats = ClassificationOrchestrator::new(oracle.clone()).run(&mut records).await;

    assert_eq!(oracle.calls(), 2);
    assert_eq!(stats.resumed, 1);
    assert_eq!(records[0].oracle_classification.as_deref(), Some("FP"));
    assert_eq!(records[0].oracle_justification.as_deref(), Some("stored earlier"));
    assert_eq!(records[0].classification_agrees, Some(false));
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential_output() {
    let sequential_oracle = oracle();
    let mut sequential = batch();
    ClassificationOrchestrator::new(sequential_oracle).run(&mut sequential).await;

    // First record finishes last
    let slow_oracle = Arc::new(
        ScriptedOracle::new(&[
            ("brute force", " tp ", "HIGH"),
            ("scanner", "TRUE POSITIVE", "low "),
        ])
        .with_delay("brute force", 30),
    );
    let mut concurrent = batch();
    let stats = ClassificationOrchestrator::new(slow_oracle.clone())
        .with_max_in_flight(3)
        .run(&mut concurrent)
        .await;

    assert_eq!(slow_oracle.calls(), 3);
    assert_eq!(stats.failures, 1);
    assert_eq!(
        serde_json::to_string(&concurrent).unwrap(),
        serde_json::to_string(&sequential).unwrap()
    );
}

/// Number of classified records in each checkpointed snapshot
fn classified_counts(snapshots: &[Vec<AlertRecord>]) -> Vec<usize> {
    snapshots
        .iter()
        .map(|batch| batch.iter().filter(|r| r.is_classified()).count())
        .collect()
}

#[tokio::test]
async fn test_sequential_run_checkpoints_after_every_call() {
    let oracle = oracle();
    let mut records = batch();
    let mut snapshots: Vec<Vec<AlertRecord>> = Vec::new();

    let stats = ClassificationOrchestrator::new(oracle.clone())
        .run_with_checkpoint(&mut records, |batch| {
            snapshots.push(batch.to_vec());
            Ok::<(), String>(())
        })
        .await
        .unwrap();

    assert_eq!(classified_counts(&snapshots), vec![1, 2, 3]);
    // Each snapshot already carries the derived fields
    assert_eq!(snapshots[0][0].oracle_classification.as_deref(), Some("TP"));
    assert_eq!(snapshots[2], records);
    assert_eq!(stats.oracle_calls, 3);
}

#[tokio::test]
async fn test_resumed_batch_checkpoints_only_new_calls() {
    let oracle = oracle();
    let mut records = batch();
    records[0].oracle_response = Some(OracleResponse::new("TP", "High", "stored earlier"));
    let mut checkpoints = 0;

    ClassificationOrchestrator::new(oracle.clone())
        .run_with_checkpoint(&mut records, |_| {
            checkpoints += 1;
            Ok::<(), String>(())
        })
        .await
        .unwrap();

    assert_eq!(checkpoints, 2);
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_checkpoints_hold_back_until_prefix_completes() {
    let slow_first = Arc::new(
        ScriptedOracle::new(&[
            ("brute force", "TP", "High"),
            ("scanner", "FP", "Low"),
        ])
        .with_delay("brute force", 50),
    );
    let mut records = batch();
    let mut snapshots: Vec<Vec<AlertRecord>> = Vec::new();

    ClassificationOrchestrator::new(slow_first.clone())
        .with_max_in_flight(3)
        .run_with_checkpoint(&mut records, |batch| {
            snapshots.push(batch.to_vec());
            Ok::<(), String>(())
        })
        .await
        .unwrap();

    // Later records finished first but are only persisted behind the first one
    assert_eq!(classified_counts(&snapshots), vec![3]);
    for snapshot in &snapshots {
        let flags: Vec<bool> = snapshot.iter().map(|r| r.is_classified()).collect();
        let first_gap = flags.iter().position(|c| !c).unwrap_or(flags.len());
        assert!(flags[first_gap..].iter().all(|c| !c), "gap in {:?}", flags);
    }
}

#[tokio::test]
async fn test_checkpoint_failure_stops_the_run() {
    let oracle = oracle();
    let mut records = batch();

    let result = ClassificationOrchestrator::new(oracle.clone())
        .run_with_checkpoint(&mut records, |_| Err("disk full".to_string()))
        .await;

    assert_eq!(result.unwrap_err(), "disk full");
    assert_eq!(oracle.calls(), 1);
    assert!(!records[1].is_classified());
}

#[tokio::test]
async fn test_dropping_concurrent_run_aborts_in_flight_calls() {
    let slow = Arc::new(
        ScriptedOracle::new(&[
            ("brute force", "TP", "High"),
            ("scanner", "FP", "Low"),
        ])
        .with_delay("brute force", 150)
        .with_delay("scanner", 150)
        .with_delay("unreachable", 150),
    );
    let orchestrator = ClassificationOrchestrator::new(slow.clone()).with_max_in_flight(3);
    let mut records = batch();

    let run = orchestrator.run(&mut records);
    assert!(tokio::time::timeout(Duration::from_millis(30), run).await.is_err());

    // Well past the oracle delay: aborted tasks never get to finish
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(slow.calls(), 3);
    assert_eq!(slow.completed(), 0);
}

#[test]
fn test_mean_time_guards_zero_calls() {
    let stats = OrchestrationStats::new("none");
    assert_eq!(stats.mean_oracle_time(), Duration::ZERO);

    let mut stats = OrchestrationStats::new("x");
    stats.record_call(Duration::from_millis(100), true);
    stats.record_call(Duration::from_millis(300), false);
    assert_eq!(stats.mean_oracle_time(), Duration::from_millis(200));
    assert_eq!(stats.failures, 1);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_mean_time_does_not_truncate_call_count() {
    let mut stats = OrchestrationStats::new("x");
    stats.oracle_calls = u32::MAX as usize + 1;
    stats.oracle_time = Duration::from_secs(u32::MAX as u64 + 1);

    assert_eq!(stats.mean_oracle_time(), Duration::from_secs(1));
}
