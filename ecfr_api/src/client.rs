//! HTTP client for the eCFR public API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{common::NoQuery, ContentQuery, Query, SearchQuery},
    types::{AgenciesResponse, SearchResponse, TitlesResponse},
    Error,
};

/// Request timeout for every eCFR call. Full-title XML documents can be large.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the eCFR API.
///
/// Holds one pooled `reqwest::Client`, so a single instance can be shared
/// across concurrent tasks behind an `Arc`.
pub struct Client {
    client: reqwest::Client,
    /// Base URL for the API. Defaults to `https://www.ecfr.gov`.
    base_api_url: String,
}

impl Client {
    /// Creates a new client pointing at the production eCFR API.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url("https://www.ecfr.gov")
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ecfr-counter/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            client,
            base_api_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    /// Sends a GET and returns the body of a 2xx response.
    ///
    /// HTTP 429 maps to [`Error::RateLimited`] so callers can choose to back off;
    /// every other non-success status maps to [`Error::HttpStatus`].
    async fn get_text<Q: Query>(
        &self,
        path: &str,
        query: Option<&Q>,
        accept: &str,
    ) -> Result<String, Error> {
        let url = self.get_url(path, query)?;
        let resp = self
            .client
            .get(url)
            .header("accept", accept)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }

        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let body = self.get_text(path, query, "application/json").await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Parse(e.to_string())
        })
    }

    /// Fetches the listing of all CFR titles with their currency dates.
    pub async fn get_titles(&self) -> Result<TitlesResponse, Error> {
        self.get::<TitlesResponse, NoQuery>("/api/versioner/v1/titles", None)
            .await
    }

    /// Fetches the nested agency directory.
    pub async fn get_agencies(&self) -> Result<AgenciesResponse, Error> {
        self.get::<AgenciesResponse, NoQuery>("/api/admin/v1/agencies.json", None)
            .await
    }

    /// Fetches the XML source of one title, scoped to a chapter, as of `date` (`YYYY-MM-DD`).
    pub async fn get_chapter_xml(
        &self,
        date: &str,
        title: u32,
        query: &ContentQuery,
    ) -> Result<String, Error> {
        self.get_text(
            format!("/api/versioner/v1/full/{}/title-{}.xml", date, title).as_str(),
            Some(query),
            "application/xml",
        )
        .await
    }

    /// Runs a full-text search and returns one page of results.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, Error> {
        self.get::<SearchResponse, SearchQuery>("/api/search/v1/results", Some(query))
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
