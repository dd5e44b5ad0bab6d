//! Query parameters for the versioner `full` content endpoint.

use url::Url;

use super::common::Query;

/// Scopes a title document down to one chapter.
///
/// The chapter identifier is passed through verbatim, including the `N/A`
/// placeholder used for references that carry no chapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentQuery {
    pub chapter: String,
}

impl ContentQuery {
    pub fn new(chapter: impl Into<String>) -> Self {
        Self {
            chapter: chapter.into(),
        }
    }
}

impl Query for ContentQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut().append_pair("chapter", &self.chapter);
        url
    }
}
