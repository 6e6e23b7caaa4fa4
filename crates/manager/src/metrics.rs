use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Execution statistics accumulated across manager runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManagerMetrics {
    /// Number of `run` invocations that reached execution.
    pub runs: u64,
    /// Successful slot executions by pass name.
    pub passes_executed: HashMap<String, u64>,
    /// Failed slot executions (run or verify) by pass name.
    pub passes_failed: HashMap<String, u64>,
    /// Slots skipped because their result was already present.
    pub passes_skipped: u64,
    /// Average slot duration by pass name.
    pub avg_pass_duration: HashMap<String, Duration>,
    /// Last successful execution time by pass name.
    pub last_run: HashMap<String, DateTime<Utc>>,
    /// Length of the most recent schedule.
    pub last_schedule_len: usize,
}

impl ManagerMetrics {
    /// Record a successful pass execution.
    pub fn record_execution(&mut self, pass_name: &str, duration: Duration) {
        *self.passes_executed.entry(pass_name.to_string()).or_default() += 1;
        self.last_run.insert(pass_name.to_string(), Utc::now());

        let count = self.passes_executed[pass_name];
        let prev_avg = self
            .avg_pass_duration
            .get(pass_name)
            .copied()
            .unwrap_or_default();

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let new_avg = if count == 1 {
            duration
        } else {
            let prev_nanos = prev_avg.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };

        self.avg_pass_duration.insert(pass_name.to_string(), new_avg);
    }

    pub fn record_failure(&mut self, pass_name: &str) {
        *self.passes_failed.entry(pass_name.to_string()).or_default() += 1;
    }

    pub fn record_skip(&mut self) {
        self.passes_skipped += 1;
    }

    pub fn record_schedule(&mut self, len: usize) {
        self.runs += 1;
        self.last_schedule_len = len;
    }
}
