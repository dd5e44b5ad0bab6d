//! Incremental recount: runs the pipeline once against the local files.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;
use ecfr_counter_lib::{refresh, validation, Client, PipelineConfig};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{print_json, print_refresh_report, OutputFormat};

/// Pipeline settings. Flags override `ECFR_*` environment variables.
#[derive(Args, Clone, Default)]
pub struct RefreshArgs {
    /// Agency snapshot written by `fetch-agencies`
    #[arg(long)]
    pub agencies: Option<PathBuf>,

    /// Amendment cache (title-chapter -> last counted amendment date)
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// CSV ledger that results are appended to
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Maximum chapters fetched at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Attempts per chapter while the upstream keeps answering 429
    #[arg(long)]
    pub retry_max: Option<u32>,

    /// Backoff unit in milliseconds, doubled on every rate-limited attempt
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Count as of this date (YYYY-MM-DD) instead of resolving it from the title listing
    #[arg(long)]
    pub as_of: Option<String>,

    /// eCFR base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

impl RefreshArgs {
    /// Environment configuration with any flags given layered on top.
    pub fn to_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::from_env();
        if let Some(ref path) = self.agencies {
            config.agencies_path = path.clone();
        }
        if let Some(ref path) = self.cache {
            config.cache_path = path.clone();
        }
        if let Some(ref path) = self.ledger {
            config.ledger_path = path.clone();
        }
        if let Some(workers) = self.concurrency {
            config.concurrency = validation::validate_concurrency(workers)?;
        }
        if let Some(attempts) = self.retry_max {
            config.retry.max_attempts = attempts;
        }
        if let Some(ms) = self.backoff_ms {
            config.retry.backoff_unit = Duration::from_millis(ms);
        }
        if let Some(ref date) = self.as_of {
            let date = validation::validate_date(date)?;
            config.as_of = Some(date.format("%Y-%m-%d").to_string());
        }
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn run(args: &RefreshArgs, format: &OutputFormat) -> Result<()> {
    let config = args.to_config()?;
    let client = Arc::new(Client::with_base_url(&config.base_url)?);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {msg}")
            .map_err(|e| anyhow!("invalid progress template: {}", e))?,
    );
    spinner.set_message(format!(
        "counting words ({} workers)...",
        config.concurrency
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = refresh(&config, client).await;
    spinner.finish_and_clear();
    let report = outcome?;

    match format {
        OutputFormat::Json => print_json(&report),
        _ => print_refresh_report(&report),
    }

    eprintln!(
        "Appended {} rows to {}",
        report.results_written,
        config.ledger_path.display()
    );
    Ok(())
}
