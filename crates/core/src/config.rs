use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match env_opt(key).as_deref() {
        Some("1") | Some("true") | Some("yes") => true,
        Some("0") | Some("false") | Some("no") => false,
        _ => default,
    }
}

/// Pass manager configuration, from env vars or a config file section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Upper bound on schedule slots for one run.
    #[serde(default = "default_schedule_limit")]
    pub schedule_limit: usize,
    /// Record per-pass execution metrics.
    #[serde(default = "default_record_metrics")]
    pub record_metrics: bool,
}

fn default_schedule_limit() -> usize { 100_000 }
fn default_record_metrics() -> bool { true }

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            schedule_limit: default_schedule_limit(),
            record_metrics: default_record_metrics(),
        }
    }
}

impl ManagerConfig {
    /// Build config from `LIBPASS_*` environment variables (call
    /// `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            schedule_limit: env_usize("LIBPASS_SCHEDULE_LIMIT", default_schedule_limit()),
            record_metrics: env_bool("LIBPASS_RECORD_METRICS", default_record_metrics()),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Manager config: schedule_limit={}, record_metrics={}",
            self.schedule_limit,
            self.record_metrics
        );
    }
}
