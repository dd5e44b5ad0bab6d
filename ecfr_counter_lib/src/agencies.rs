//! Agency snapshot: fetched from the directory, flattened, stored as JSON,
//! and loaded as the pipeline's input.

use std::collections::HashMap;
use std::path::Path;

use ecfr_api::types::{AgencyRecord, TitlesResponse};
use ecfr_api::Client;

use crate::error::CounterError;
use crate::model::{Agency, Reference, NO_CHAPTER};

/// Flattens the nested directory into a list, parent before children,
/// siblings in source order.
///
/// Walks with an explicit stack so arbitrarily deep nesting cannot exhaust
/// the call stack.
pub fn flatten_agencies(records: &[AgencyRecord]) -> Vec<Agency> {
    let mut flat = Vec::new();
    let mut stack: Vec<&AgencyRecord> = records.iter().rev().collect();

    while let Some(record) = stack.pop() {
        flat.push(Agency {
            name: record.name.clone(),
            slug: record.slug.clone(),
            references: record
                .cfr_references
                .iter()
                .map(|r| {
                    Reference::new(r.title, r.chapter.as_deref().unwrap_or(NO_CHAPTER))
                })
                .collect(),
        });
        stack.extend(record.children.iter().rev());
    }

    flat
}

/// Copies each title's `latest_amended_on` onto the references of that title.
///
/// References whose title is missing from the listing, or has no amendment
/// date, are left untouched. Returns how many references were stamped.
pub fn stamp_amendment_dates(agencies: &mut [Agency], titles: &TitlesResponse) -> usize {
    let by_title: HashMap<u32, &str> = titles
        .titles
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|t| Some((t.number?, t.latest_amended_on.as_deref()?)))
        .collect();

    let mut stamped = 0;
    for reference in agencies.iter_mut().flat_map(|a| a.references.iter_mut()) {
        if let Some(date) = by_title.get(&reference.title) {
            reference.latest_amended_on = Some(date.to_string());
            stamped += 1;
        }
    }
    stamped
}

/// Downloads the agency directory and flattens it.
///
/// With `with_amendment_dates`, also fetches the title listing and stamps
/// each reference with its title's latest amendment date. A failed listing
/// is logged and leaves the references unstamped.
pub async fn fetch_agency_snapshot(
    client: &Client,
    with_amendment_dates: bool,
) -> Result<Vec<Agency>, CounterError> {
    let resp = client.get_agencies().await?;
    let mut agencies = flatten_agencies(&resp.agencies);
    tracing::info!(
        "Fetched {} top-level agencies ({} after flattening)",
        resp.agencies.len(),
        agencies.len()
    );

    if with_amendment_dates {
        match client.get_titles().await {
            Ok(titles) => {
                let stamped = stamp_amendment_dates(&mut agencies, &titles);
                tracing::info!("Stamped amendment dates on {} references", stamped);
            }
            Err(e) => tracing::warn!("Title listing unavailable, amendment dates not stamped: {}", e),
        }
    }

    Ok(agencies)
}

/// Reads the agency snapshot. Missing, unreadable, malformed, or empty
/// snapshots are all errors.
pub fn load_agencies(path: &Path) -> Result<Vec<Agency>, CounterError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CounterError::io(path, e))?;
    let agencies: Vec<Agency> = serde_json::from_str(&raw)?;
    if agencies.is_empty() {
        return Err(CounterError::NoAgencies);
    }
    Ok(agencies)
}

/// Writes the agency snapshot as pretty-printed JSON.
pub fn save_agencies(path: &Path, agencies: &[Agency]) -> Result<(), CounterError> {
    let json = serde_json::to_string_pretty(agencies)?;
    std::fs::write(path, json).map_err(|e| CounterError::io(path, e))?;
    tracing::info!("Agency data saved to {}", path.display());
    Ok(())
}
