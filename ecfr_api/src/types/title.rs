use serde::{Deserialize, Serialize};

use super::string_or_none;

/// Body of `GET /api/versioner/v1/titles`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TitlesResponse {
    /// `None` when the upstream omitted the list entirely.
    #[serde(default)]
    pub titles: Option<Vec<TitleSummary>>,
}

/// One title record from the listing. Date fields that are missing or not
/// strings deserialize to `None` instead of failing the whole response.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TitleSummary {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub latest_amended_on: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub latest_issue_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub up_to_date_as_of: Option<String>,
    #[serde(default)]
    pub reserved: bool,
}
