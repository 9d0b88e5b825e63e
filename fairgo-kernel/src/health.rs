use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use time::OffsetDateTime;

use crate::normalize::format_iso;

#[derive(Debug, Serialize, Deserialize)]
pub struct KernelHealth {
    pub uptime_seconds: u64,
    pub upstream_status: String,
    pub fetch_successes: u32,
    pub fetch_failures: u32,
    pub last_success: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct UpstreamOutcome {
    status: String,
    last_success: Option<String>,
    last_error: Option<String>,
}

#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
    successes: Arc<AtomicU32>,
    failures: Arc<AtomicU32>,
    outcome: Arc<Mutex<UpstreamOutcome>>,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            successes: Arc::new(AtomicU32::new(0)),
            failures: Arc::new(AtomicU32::new(0)),
            outcome: Arc::new(Mutex::new(UpstreamOutcome {
                status: "unknown".to_string(),
                ..Default::default()
            })),
        }
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        let mut outcome = self.outcome.lock();
        outcome.status = "available".to_string();
        outcome.last_success = format_iso(OffsetDateTime::now_utc());
    }

    pub fn record_failure(&self, details: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        let mut outcome = self.outcome.lock();
        outcome.status = "unavailable".to_string();
        outcome.last_error = Some(details.to_string());
    }

    pub fn get_health(&self) -> KernelHealth {
        let outcome = self.outcome.lock();
        KernelHealth {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            upstream_status: outcome.status.clone(),
            fetch_successes: self.successes.load(Ordering::Relaxed),
            fetch_failures: self.failures.load(Ordering::Relaxed),
            last_success: outcome.last_success.clone(),
            last_error: outcome.last_error.clone(),
        }
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}
