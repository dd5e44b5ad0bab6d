//! Query builder for the full-text search results endpoint.

use url::Url;

use super::common::Query;

/// Full-text search query.
///
/// ```
/// use ecfr_api::SearchQuery;
///
/// let query = SearchQuery::new("emissions").with_per_page(50);
/// assert_eq!(query.per_page, Some(50));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    /// Search term(s), passed as-is to the upstream engine.
    pub query: String,
    /// 1-indexed page number. `None` uses the API default.
    pub page: Option<u32>,
    /// Results per page. `None` uses the API default.
    pub per_page: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

impl Query for SearchQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut().append_pair("query", &self.query);
        if let Some(page) = self.page {
            url.query_pairs_mut()
                .append_pair("page", &page.to_string());
        }
        if let Some(per_page) = self.per_page {
            url.query_pairs_mut()
                .append_pair("per_page", &per_page.to_string());
        }
        url
    }
}
