//! Run configuration: file locations, pool size, retry policy, upstream URL.
//!
//! Defaults can be overridden through environment variables, and the CLI
//! overrides those in turn.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CounterError;
use crate::retry::{RetryPolicy, DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_ATTEMPTS};
use crate::validation;

pub const DEFAULT_BASE_URL: &str = "https://www.ecfr.gov";
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_AGENCIES_PATH: &str = "agencies_data.json";
pub const DEFAULT_CACHE_PATH: &str = "processed_dates.json";
pub const DEFAULT_LEDGER_PATH: &str = "word_counts.csv";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub base_url: String,
    pub agencies_path: PathBuf,
    pub cache_path: PathBuf,
    pub ledger_path: PathBuf,
    /// Number of units processed at once.
    pub concurrency: usize,
    pub retry: RetryPolicy,
    /// Skips the title listing and fetches every chapter as of this date.
    pub as_of: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            agencies_path: PathBuf::from(DEFAULT_AGENCIES_PATH),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            as_of: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `ECFR_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("ECFR_BASE_URL").unwrap_or(defaults.base_url),
            agencies_path: env_path("ECFR_AGENCIES_PATH", defaults.agencies_path),
            cache_path: env_path("ECFR_CACHE_PATH", defaults.cache_path),
            ledger_path: env_path("ECFR_LEDGER_PATH", defaults.ledger_path),
            concurrency: env_usize("ECFR_CONCURRENCY", DEFAULT_CONCURRENCY),
            retry: RetryPolicy {
                max_attempts: env_u64("ECFR_RETRY_MAX", DEFAULT_MAX_ATTEMPTS as u64) as u32,
                backoff_unit: Duration::from_millis(env_u64(
                    "ECFR_BACKOFF_UNIT_MS",
                    DEFAULT_BACKOFF_UNIT.as_millis() as u64,
                )),
            },
            as_of: None,
        }
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), CounterError> {
        validation::validate_concurrency(self.concurrency)?;
        if self.retry.max_attempts == 0 {
            return Err(CounterError::InvalidInput(
                "retry attempts must be at least 1".to_string(),
            ));
        }
        if let Some(ref date) = self.as_of {
            validation::validate_date(date)?;
        }
        Ok(())
    }
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var_os(key).map(PathBuf::from).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
