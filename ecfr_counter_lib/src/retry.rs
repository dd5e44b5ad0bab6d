//! Exponential backoff on HTTP 429 plus request outcome accounting.
//!
//! Attempt `n` (0-based) that gets rate limited waits `unit * 2^n` before the
//! next try: 1, 2, 4, 8, 16 units for the default five attempts. The wait
//! also follows the final rate-limited attempt before giving up. Any other
//! error ends the loop immediately.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ecfr_api::Error;
use tokio::time::sleep;

/// Default attempt ceiling for one content fetch.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff time unit.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// How many times to try and how long one backoff unit lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    /// Wait after the rate-limited attempt `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = 1u32 << attempt.min(16);
        self.backoff_unit.saturating_mul(exp)
    }
}

/// Atomic counters tracking API request outcomes.
#[derive(Debug, Default)]
pub struct RequestTracker {
    requests_made: AtomicU64,
    requests_succeeded: AtomicU64,
    requests_rate_limited: AtomicU64,
    requests_failed: AtomicU64,
    /// Cumulative backoff time in milliseconds.
    total_backoff_ms: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limited(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backoff(&self, duration: Duration) {
        self.total_backoff_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Snapshot the current counters.
    pub fn summary(&self) -> TrackerSummary {
        TrackerSummary {
            requests_made: self.requests_made.load(Ordering::Relaxed),
            requests_succeeded: self.requests_succeeded.load(Ordering::Relaxed),
            requests_rate_limited: self.requests_rate_limited.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            total_backoff: Duration::from_millis(self.total_backoff_ms.load(Ordering::Relaxed)),
        }
    }
}

/// Immutable snapshot of tracker counters for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TrackerSummary {
    pub requests_made: u64,
    pub requests_succeeded: u64,
    pub requests_rate_limited: u64,
    pub requests_failed: u64,
    #[serde(serialize_with = "duration_secs")]
    pub total_backoff: Duration,
}

fn duration_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Runs `operation` until it succeeds, fails with something other than
/// [`Error::RateLimited`], or `policy.max_attempts` attempts were rate limited.
///
/// Exhaustion returns `Err(Error::RateLimited)`.
pub async fn with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    tracker: &RequestTracker,
    operation: F,
) -> Result<T, Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    for attempt in 0..policy.max_attempts {
        match operation().await {
            Ok(val) => {
                tracker.record_success();
                return Ok(val);
            }
            Err(Error::RateLimited) => {
                tracker.record_rate_limited();
                let wait = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    "Rate limit exceeded (attempt {}/{}). Retrying after {:.1}s",
                    attempt + 1,
                    policy.max_attempts,
                    wait.as_secs_f64()
                );
                tracker.record_backoff(wait);
                sleep(wait).await;
            }
            Err(e) => {
                tracker.record_failure();
                return Err(e);
            }
        }
    }

    Err(Error::RateLimited)
}
