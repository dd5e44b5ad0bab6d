use serde::{Deserialize, Serialize};

/// Body of `GET /api/search/v1/results`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub meta: Option<SearchMeta>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResult {
    #[serde(default)]
    pub starts_on: Option<String>,
    #[serde(default)]
    pub ends_on: Option<String>,
    #[serde(rename = "type", default)]
    pub result_type: Option<String>,
    /// Highlighted snippet; matches are wrapped in markup such as `<strong>`.
    #[serde(default)]
    pub full_text_excerpt: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchMeta {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}
