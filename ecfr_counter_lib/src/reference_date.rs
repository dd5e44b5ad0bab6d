//! Resolves the as-of date used for every content fetch in a run.
//!
//! Policy: the earliest `up_to_date_as_of` across all titles, with no offset.
//! Every title is guaranteed to have a published version on that date, so
//! chapter fetches never ask for a date some title has not reached yet.

use chrono::NaiveDate;
use ecfr_api::types::TitlesResponse;
use ecfr_api::Client;

/// Picks the minimum valid `up_to_date_as_of` from a title listing.
///
/// Records whose date is missing, not a string, or not `YYYY-MM-DD` are
/// discarded. Returns `None` when the listing is absent or nothing survives.
pub fn earliest_as_of(resp: &TitlesResponse) -> Option<String> {
    resp.titles
        .as_deref()?
        .iter()
        .filter_map(|title| title.up_to_date_as_of.as_deref())
        .filter(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok())
        .min()
        .map(str::to_string)
}

/// Calls the title listing and resolves the run's reference date.
///
/// Any transport failure, non-success status, malformed body, or empty
/// result yields `None`; the caller decides whether that aborts the run.
pub async fn resolve_reference_date(client: &Client) -> Option<String> {
    let resp = match client.get_titles().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!("Failed to fetch title listing: {}", e);
            return None;
        }
    };
    match earliest_as_of(&resp) {
        Some(date) => {
            tracing::info!("Resolved reference date {}", date);
            Some(date)
        }
        None => {
            tracing::warn!("No valid 'up_to_date_as_of' dates found in title listing");
            None
        }
    }
}
