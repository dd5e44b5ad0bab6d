use chrono::NaiveDate;

use crate::error::CounterError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_CONCURRENCY: usize = 64;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, CounterError> {
    if input.len() > max_len {
        return Err(CounterError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(CounterError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a search term: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, CounterError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a date in YYYY-MM-DD format.
pub fn validate_date(input: &str) -> Result<NaiveDate, CounterError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        CounterError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        ))
    })
}

/// Validate worker pool size: must be 1..=MAX_CONCURRENCY.
pub fn validate_concurrency(workers: usize) -> Result<usize, CounterError> {
    if !(1..=MAX_CONCURRENCY).contains(&workers) {
        return Err(CounterError::InvalidInput(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, workers
        )));
    }
    Ok(workers)
}

/// Validate results-per-page for search (must be 1..=1000).
pub fn validate_per_page(per_page: u32) -> Result<u32, CounterError> {
    if !(1..=1000).contains(&per_page) {
        return Err(CounterError::InvalidInput(
            "per_page must be between 1 and 1000".to_string(),
        ));
    }
    Ok(per_page)
}
