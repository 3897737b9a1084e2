use std::time::Duration;

use serde::Serialize;

/// Run statistics for one orchestration pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrchestrationStats {
    pub oracle: String,
    /// Records in the batch
    pub processed: usize,
    /// Records skipped because they already carried a response
    pub resumed: usize,
    pub oracle_calls: usize,
    pub failures: usize,
    /// Sum of per-call latency, failed calls included
    pub oracle_time: Duration,
    pub wall_time: Duration,
}

impl OrchestrationStats {
    pub fn new(oracle: &str) -> Self {
        Self {
            oracle: oracle.to_string(),
            ..Default::default()
        }
    }

    pub fn record_call(&mut self, latency: Duration, succeeded: bool) {
        self.oracle_calls += 1;
        self.oracle_time += latency;
        if !succeeded {
            self.failures += 1;
        }
    }

    /// Mean latency per oracle call, zero when nothing was called
    pub fn mean_oracle_time(&self) -> Duration {
        if self.oracle_calls == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.oracle_time.as_secs_f64() / self.oracle_calls as f64)
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Classified {} records with {} ({} calls, {} failed, {} resumed) in {:.2}s, oracle {:.2}s, {:.4}s/call",
            self.processed,
            self.oracle,
            self.oracle_calls,
            self.failures,
            self.resumed,
            self.wall_time.as_secs_f64(),
            self.oracle_time.as_secs_f64(),
            self.mean_oracle_time().as_secs_f64(),
        )
    }
}
