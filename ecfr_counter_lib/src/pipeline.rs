//! Concurrent fetch-and-count pipeline.
//!
//! One unit of work per (agency, reference) pair. Units run as tokio tasks
//! gated by a semaphore, report back over an mpsc channel, and are collected
//! in completion order. Per-unit failures are logged and absorbed; only setup
//! failures in [`refresh`] abort a run.

use std::sync::Arc;

use ecfr_api::Client;
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::agencies::load_agencies;
use crate::cache::AmendmentCache;
use crate::config::PipelineConfig;
use crate::counter::ChapterCounter;
use crate::error::CounterError;
use crate::filter::should_recount;
use crate::ledger::commit;
use crate::model::{Agency, Reference, WordCountResult};
use crate::reference_date::resolve_reference_date;
use crate::retry::TrackerSummary;

/// What happened to one unit of work.
#[derive(Debug)]
pub enum UnitStatus {
    /// Cached amendment date matches; nothing fetched.
    Unchanged,
    /// Recounted; the cache entry was advanced.
    Counted(WordCountResult),
    /// Upstream refused (non-success status or retries exhausted).
    NoCount,
    /// Transport or parse failure.
    Failed(CounterError),
}

/// Message sent from unit tasks to the collector.
struct UnitReport {
    agency_name: String,
    title: u32,
    chapter: String,
    status: UnitStatus,
}

/// Tally of unit outcomes for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub units: usize,
    pub unchanged: usize,
    pub counted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Results in completion order plus the outcome tally.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub results: Vec<WordCountResult>,
    pub stats: RunStats,
}

/// Processes one unit: change filter, count, cache update.
async fn process_unit(
    agency_name: &str,
    agency_slug: &str,
    reference: &Reference,
    date: &str,
    cache: &AmendmentCache,
    counter: &ChapterCounter,
) -> UnitStatus {
    let key = reference.cache_key();
    let amended = reference.amendment_date();
    if !should_recount(cache, &key, amended) {
        return UnitStatus::Unchanged;
    }

    tracing::debug!(
        "Recalculating for Agency: {} | Title {}, Chapter {}",
        agency_name,
        reference.title,
        reference.chapter
    );
    match counter
        .count_words(date, reference.title, &reference.chapter)
        .await
    {
        Ok(Some(word_count)) => {
            cache.set(key, amended.to_string());
            UnitStatus::Counted(WordCountResult {
                agency_name: agency_name.to_string(),
                agency_slug: agency_slug.to_string(),
                title: reference.title,
                chapter: reference.chapter.clone(),
                word_count,
            })
        }
        Ok(None) => UnitStatus::NoCount,
        Err(e) => UnitStatus::Failed(e),
    }
}

/// Fans every (agency, reference) unit out over at most `concurrency`
/// concurrent workers and collects the recounted results.
pub async fn run_pipeline(
    agencies: &[Agency],
    cache: Arc<AmendmentCache>,
    counter: Arc<ChapterCounter>,
    date: &str,
    concurrency: usize,
) -> PipelineOutput {
    let concurrency = concurrency.max(1);
    let date: Arc<str> = Arc::from(date);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let (tx, mut rx) = mpsc::channel::<UnitReport>(concurrency * 2);
    let mut join_set = JoinSet::new();
    let mut output = PipelineOutput::default();

    for agency in agencies {
        for reference in &agency.references {
            output.stats.units += 1;
            let sem = Arc::clone(&semaphore);
            let sender = tx.clone();
            let cache = Arc::clone(&cache);
            let counter = Arc::clone(&counter);
            let date = Arc::clone(&date);
            let agency_name = agency.name.clone();
            let agency_slug = agency.slug.clone();
            let reference = reference.clone();
            let span = tracing::info_span!(
                "unit",
                agency = %agency_name,
                title = reference.title,
                chapter = %reference.chapter
            );

            join_set.spawn(
                async move {
                    let Ok(_permit) = sem.acquire().await else {
                        return;
                    };
                    let status = process_unit(
                        &agency_name,
                        &agency_slug,
                        &reference,
                        &date,
                        &cache,
                        &counter,
                    )
                    .await;
                    let _ = sender
                        .send(UnitReport {
                            agency_name,
                            title: reference.title,
                            chapter: reference.chapter,
                            status,
                        })
                        .await;
                }
                .instrument(span),
            );
        }
    }
    drop(tx);

    tracing::info!(
        "Dispatched {} units across {} workers",
        output.stats.units,
        concurrency
    );

    while let Some(report) = rx.recv().await {
        match report.status {
            UnitStatus::Unchanged => output.stats.unchanged += 1,
            UnitStatus::Counted(result) => {
                tracing::debug!(
                    "Counted {} words for {} | Title {}, Chapter {}",
                    result.word_count,
                    report.agency_name,
                    report.title,
                    report.chapter
                );
                output.stats.counted += 1;
                output.results.push(result);
            }
            UnitStatus::NoCount => output.stats.skipped += 1,
            UnitStatus::Failed(err) => {
                tracing::error!(
                    "Error processing {} - Title {}, Chapter {}: {}",
                    report.agency_name,
                    report.title,
                    report.chapter,
                    err
                );
                output.stats.failed += 1;
            }
        }
    }

    while let Some(joined) = join_set.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Worker task did not complete: {}", e);
            output.stats.failed += 1;
        }
    }

    output
}

/// Outcome of a full refresh, reported to the CLI and the web trigger.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub reference_date: String,
    pub agencies: usize,
    pub results_written: usize,
    pub stats: RunStats,
    pub requests: TrackerSummary,
}

/// Runs the whole pipeline against the files named in `config`.
///
/// Setup failures (agency snapshot, cache file, reference date) abort before
/// any unit is dispatched. Ledger and cache are written only after every
/// unit has finished.
pub async fn refresh(
    config: &PipelineConfig,
    client: Arc<Client>,
) -> Result<RefreshReport, CounterError> {
    config.validate()?;

    tracing::info!("Loading agency data from {}", config.agencies_path.display());
    let agencies = load_agencies(&config.agencies_path)?;
    tracing::info!("Loaded {} agencies", agencies.len());

    let cache = Arc::new(AmendmentCache::load(&config.cache_path)?);

    let reference_date = match config.as_of {
        Some(ref date) => date.clone(),
        None => resolve_reference_date(&client)
            .await
            .ok_or(CounterError::NoReferenceDate)?,
    };
    tracing::info!("Using reference date: {}", reference_date);

    let counter = Arc::new(ChapterCounter::new(client, config.retry));
    let output = run_pipeline(
        &agencies,
        Arc::clone(&cache),
        Arc::clone(&counter),
        &reference_date,
        config.concurrency,
    )
    .await;

    commit(
        &output.results,
        &config.ledger_path,
        &cache,
        &config.cache_path,
    )?;

    let stats = output.stats;
    tracing::info!(
        "Run complete: {} units, {} counted, {} unchanged, {} skipped, {} failed",
        stats.units,
        stats.counted,
        stats.unchanged,
        stats.skipped,
        stats.failed
    );

    Ok(RefreshReport {
        reference_date,
        agencies: agencies.len(),
        results_written: output.results.len(),
        stats,
        requests: counter.summary(),
    })
}
