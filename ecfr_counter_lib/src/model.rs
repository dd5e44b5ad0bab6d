//! Domain records shared by the pipeline, the sink, and the agency snapshot.

use serde::{Deserialize, Serialize};

/// Chapter identifier used when the directory gives none.
pub const NO_CHAPTER: &str = "N/A";

/// Amendment date assumed for references that carry none.
pub const AMENDMENT_NOT_AVAILABLE: &str = "not available";

/// A regulatory body and the CFR segments it is responsible for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Agency {
    pub name: String,
    pub slug: String,
    #[serde(rename = "cfr_references", default)]
    pub references: Vec<Reference>,
}

/// A countable unit of regulatory text: one chapter of one title.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub title: u32,
    #[serde(default = "default_chapter")]
    pub chapter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_amended_on: Option<String>,
}

fn default_chapter() -> String {
    NO_CHAPTER.to_string()
}

impl Reference {
    pub fn new(title: u32, chapter: impl Into<String>) -> Self {
        Self {
            title,
            chapter: chapter.into(),
            latest_amended_on: None,
        }
    }

    pub fn with_amended_on(mut self, date: impl Into<String>) -> Self {
        self.latest_amended_on = Some(date.into());
        self
    }

    /// Cache key in the `"{title}-{chapter}"` form.
    pub fn cache_key(&self) -> String {
        cache_key(self.title, &self.chapter)
    }

    /// The amendment date used for change detection, falling back to
    /// [`AMENDMENT_NOT_AVAILABLE`] when the reference has none.
    pub fn amendment_date(&self) -> &str {
        self.latest_amended_on
            .as_deref()
            .unwrap_or(AMENDMENT_NOT_AVAILABLE)
    }
}

/// Builds the amendment cache key for a title/chapter pair.
pub fn cache_key(title: u32, chapter: &str) -> String {
    format!("{}-{}", title, chapter)
}

/// Word count for one agency reference. One ledger row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WordCountResult {
    #[serde(rename = "Agency")]
    pub agency_name: String,
    #[serde(rename = "Slug")]
    pub agency_slug: String,
    #[serde(rename = "Title")]
    pub title: u32,
    #[serde(rename = "Chapter")]
    pub chapter: String,
    #[serde(rename = "Word Count")]
    pub word_count: u64,
}
