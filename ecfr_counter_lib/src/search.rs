//! Ad-hoc word-occurrence count over full-text search excerpts.
//!
//! Unrelated to the ledger pipeline: asks the search API for one page of
//! results and counts how often the term appears in the returned snippets.

use ecfr_api::{Client, SearchQuery};
use regex::Regex;
use serde::Serialize;

use crate::error::CounterError;
use crate::validation;

pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub query: String,
    /// Number of results that carried an excerpt.
    pub excerpts: usize,
    /// Case-insensitive whole-word matches of `query` across all excerpts.
    pub occurrences: u64,
}

/// Counts whole-word, case-insensitive occurrences of `term` in `excerpts`,
/// ignoring highlight markup such as `<strong>`.
pub fn count_occurrences<S: AsRef<str>>(term: &str, excerpts: &[S]) -> Result<u64, CounterError> {
    let tag_re = Regex::new(r"<[^>]*>")
        .map_err(|e| CounterError::InvalidInput(format!("regex compile error: {}", e)))?;
    let term_re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term.trim())))
        .map_err(|e| CounterError::InvalidInput(format!("regex compile error: {}", e)))?;

    Ok(excerpts
        .iter()
        .map(|excerpt| {
            let plain = tag_re.replace_all(excerpt.as_ref(), "");
            term_re.find_iter(&plain).count() as u64
        })
        .sum())
}

/// Runs the search and counts occurrences of `term` in the excerpts.
pub async fn search_word_occurrences(
    client: &Client,
    term: &str,
    per_page: u32,
) -> Result<SearchSummary, CounterError> {
    let term = validation::validate_search(term)?;
    let per_page = validation::validate_per_page(per_page)?;

    let resp = client
        .search(&SearchQuery::new(term.clone()).with_per_page(per_page))
        .await?;
    let excerpts: Vec<&str> = resp
        .results
        .iter()
        .filter_map(|r| r.full_text_excerpt.as_deref())
        .collect();
    let occurrences = count_occurrences(&term, &excerpts)?;
    tracing::info!(
        "Search '{}': {} occurrences across {} excerpts",
        term,
        occurrences,
        excerpts.len()
    );

    Ok(SearchSummary {
        query: term,
        excerpts: excerpts.len(),
        occurrences,
    })
}
