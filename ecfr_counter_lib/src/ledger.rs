//! Result Sink: the append-only CSV ledger and the end-of-run commit.
//!
//! The ledger has no uniqueness constraint. Resetting the amendment cache and
//! running again appends a second row for the same agency/title/chapter.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::Path;

use serde::Serialize;

use crate::cache::AmendmentCache;
use crate::error::CounterError;
use crate::model::WordCountResult;

/// Fixed ledger header row.
pub const LEDGER_HEADER: [&str; 5] = ["Agency", "Slug", "Title", "Chapter", "Word Count"];

/// Creates the ledger with its header row unless a non-empty file already exists.
///
/// Returns `true` when the header was written.
pub fn ensure_ledger(path: &Path) -> Result<bool, CounterError> {
    let has_content = match std::fs::metadata(path) {
        Ok(meta) => meta.len() > 0,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(CounterError::io(path, e)),
    };
    if has_content {
        return Ok(false);
    }

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(LEDGER_HEADER)?;
    wtr.flush().map_err(|e| CounterError::io(path, e))?;
    Ok(true)
}

/// Appends one row per result, in the given order.
pub fn append_results(path: &Path, results: &[WordCountResult]) -> Result<usize, CounterError> {
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| CounterError::io(path, e))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush().map_err(|e| CounterError::io(path, e))?;
    Ok(results.len())
}

/// Reads every ledger row.
pub fn read_ledger(path: &Path) -> Result<Vec<WordCountResult>, CounterError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Word totals for one agency across ledger rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgencyTotal {
    pub agency_name: String,
    pub agency_slug: String,
    /// Ledger rows contributing to this total, duplicates included.
    pub rows: usize,
    pub word_count: u64,
}

/// Sums ledger rows per agency slug, largest total first.
///
/// Rows are taken as-is: a unit recounted in several runs contributes once
/// per row.
pub fn totals_by_agency(rows: &[WordCountResult]) -> Vec<AgencyTotal> {
    let mut totals: BTreeMap<&str, AgencyTotal> = BTreeMap::new();
    for row in rows {
        let entry = totals
            .entry(row.agency_slug.as_str())
            .or_insert_with(|| AgencyTotal {
                agency_name: row.agency_name.clone(),
                agency_slug: row.agency_slug.clone(),
                rows: 0,
                word_count: 0,
            });
        entry.rows += 1;
        entry.word_count += row.word_count;
    }

    let mut totals: Vec<AgencyTotal> = totals.into_values().collect();
    totals.sort_by(|a, b| {
        b.word_count
            .cmp(&a.word_count)
            .then_with(|| a.agency_slug.cmp(&b.agency_slug))
    });
    totals
}

/// Persists a finished run: ledger rows first, then the cache snapshot.
///
/// If the process dies between the two writes, the next run recounts the
/// same units and appends them again rather than losing them.
pub fn commit(
    results: &[WordCountResult],
    ledger_path: &Path,
    cache: &AmendmentCache,
    cache_path: &Path,
) -> Result<(), CounterError> {
    if ensure_ledger(ledger_path)? {
        tracing::info!("Created ledger {}", ledger_path.display());
    }
    let appended = append_results(ledger_path, results)?;
    tracing::info!("Exported {} results to {}", appended, ledger_path.display());

    cache.save(cache_path)?;
    tracing::debug!(
        "Saved {} amendment dates to {}",
        cache.len(),
        cache_path.display()
    );
    Ok(())
}
