//! Classification Orchestrator
//!
//! Drives the oracle over a batch:
//! 1. skip records that already carry a response (resumable reruns)
//! 2. call the oracle, `Err` becomes the `ERROR` sentinel, batch continues
//! 3. extract normalized fields and strict match flags for every record
//!
//! Sequential by default. With `max_in_flight > 1` each pending record gets
//! its own task in a `JoinSet`; results are applied by batch position, so
//! output does not depend on completion order.
//!
//! Every time the completed prefix of the pending list grows, the whole batch
//! is handed to a checkpoint callback. Dropping the run future mid-batch
//! aborts the in-flight calls; whatever was checkpointed resumes on rerun.

pub mod extract;
pub mod stats;

#[cfg(test)]
mod tests;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::logic::alert::{AlertRecord, OracleResponse};
use crate::logic::oracle::{ClassifierOracle, OracleError};

pub use extract::apply_response;
pub use stats::OrchestrationStats;

/// Result of one oracle call, latency included even on failure
struct CallOutcome {
    result: Result<OracleResponse, OracleError>,
    latency: Duration,
}

pub struct ClassificationOrchestrator {
    oracle: Arc<dyn ClassifierOracle>,
    max_in_flight: usize,
}

impl ClassificationOrchestrator {
    pub fn new(oracle: Arc<dyn ClassifierOracle>) -> Self {
        Self { oracle, max_in_flight: 1 }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Classify every record in place and return run statistics
    pub async fn run(&self, records: &mut [AlertRecord]) -> OrchestrationStats {
        let no_checkpoint = |_: &[AlertRecord]| Ok::<(), Infallible>(());
        match self.run_with_checkpoint(records, no_checkpoint).await {
            Ok(stats) => stats,
            Err(never) => match never {},
        }
    }

    /// Like `run`, persisting progress through `checkpoint`.
    ///
    /// A checkpoint error stops the run; in-flight calls are aborted.
    pub async fn run_with_checkpoint<F, E>(
        &self,
        records: &mut [AlertRecord],
        mut checkpoint: F,
    ) -> Result<OrchestrationStats, E>
    where
        F: FnMut(&[AlertRecord]) -> Result<(), E>,
    {
        let started = Instant::now();
        let mut stats = OrchestrationStats::new(self.oracle.name());

        let pending: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_classified())
            .map(|(i, _)| i)
            .collect();
        stats.resumed = records.len() - pending.len();

        if stats.resumed > 0 {
            log::info!("Resuming: {} records already classified, {} pending", stats.resumed, pending.len());
        }

        // Stored responses are re-derived so reruns stay byte-identical
        for record in records.iter_mut().filter(|r| r.is_classified()) {
            apply_response(record);
        }

        if self.max_in_flight > 1 && pending.len() > 1 {
            self.call_concurrent(records, &pending, &mut stats, &mut checkpoint).await?;
        } else {
            self.call_sequential(records, &pending, &mut stats, &mut checkpoint).await?;
        }

        stats.processed = records.len();
        stats.wall_time = started.elapsed();
        log::info!("{}", stats.summary_line());
        Ok(stats)
    }

    async fn call_sequential<F, E>(
        &self,
        records: &mut [AlertRecord],
        pending: &[usize],
        stats: &mut OrchestrationStats,
        checkpoint: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(&[AlertRecord]) -> Result<(), E>,
    {
        for &position in pending {
            let record = &records[position];
            let started = Instant::now();
            let result = self.oracle.classify(&record.description, &record.alert).await;
            let outcome = CallOutcome { result, latency: started.elapsed() };

            log::debug!("Alert {} classified in {:?}", record.id, outcome.latency);
            settle(&mut records[position], outcome, stats);
            checkpoint(records)?;
        }

        Ok(())
    }

    async fn call_concurrent<F, E>(
        &self,
        records: &mut [AlertRecord],
        pending: &[usize],
        stats: &mut OrchestrationStats,
        checkpoint: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(&[AlertRecord]) -> Result<(), E>,
    {
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        // Aborts every task still running when dropped
        let mut tasks = JoinSet::new();

        for (slot, &position) in pending.iter().enumerate() {
            let oracle = Arc::clone(&self.oracle);
            let permits = Arc::clone(&permits);
            let description = records[position].description.clone();
            let payload = records[position].alert.clone();

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let started = Instant::now();
                let result = oracle.classify(&description, &payload).await;
                (slot, CallOutcome { result, latency: started.elapsed() })
            });
        }

        // Finished calls wait here until every earlier slot is settled
        let mut finished: Vec<Option<CallOutcome>> = pending.iter().map(|_| None).collect();
        let mut next = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcome)) => finished[slot] = Some(outcome),
                Err(e) => log::warn!("Oracle task failed: {}", e),
            }

            if flush_prefix(records, pending, &mut finished, &mut next, stats) {
                checkpoint(records)?;
            }
        }

        // Slots left empty belong to tasks that panicked
        for outcome in finished.iter_mut().skip(next).filter(|o| o.is_none()) {
            *outcome = Some(CallOutcome {
                result: Err(OracleError::NetworkError("oracle task aborted".to_string())),
                latency: Duration::ZERO,
            });
        }
        if flush_prefix(records, pending, &mut finished, &mut next, stats) {
            checkpoint(records)?;
        }

        Ok(())
    }
}

/// Settle the contiguous run of finished slots starting at `next`.
/// Returns whether anything was settled.
fn flush_prefix(
    records: &mut [AlertRecord],
    pending: &[usize],
    finished: &mut [Option<CallOutcome>],
    next: &mut usize,
    stats: &mut OrchestrationStats,
) -> bool {
    let start = *next;
    while let Some(outcome) = finished.get_mut(*next).and_then(Option::take) {
        settle(&mut records[pending[*next]], outcome, stats);
        *next += 1;
    }
    *next > start
}

/// Store the response (or the sentinel) and derive the record's fields
fn settle(record: &mut AlertRecord, outcome: CallOutcome, stats: &mut OrchestrationStats) {
    stats.record_call(outcome.latency, outcome.result.is_ok());

    let response = match outcome.result {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Oracle failed for alert {}: {}", record.id, e);
            OracleResponse::error_sentinel()
        }
    };
    record.oracle_response = Some(response);
    apply_response(record);
}
