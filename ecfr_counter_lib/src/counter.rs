//! Chapter Word Counter: fetch one title/chapter document and count its words.

use std::sync::Arc;

use ecfr_api::{Client, ContentQuery};

use crate::error::CounterError;
use crate::retry::{with_backoff, RequestTracker, RetryPolicy, TrackerSummary};
use crate::word_count::count_content_words;

/// Fetches chapter XML with rate-limit backoff and counts content words.
///
/// Shared by every pipeline worker; the tracker aggregates outcomes across
/// all of them.
pub struct ChapterCounter {
    client: Arc<Client>,
    policy: RetryPolicy,
    tracker: RequestTracker,
}

impl ChapterCounter {
    pub fn new(client: Arc<Client>, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            tracker: RequestTracker::new(),
        }
    }

    /// Counts words in `title`/`chapter` as of `date`.
    ///
    /// - `Ok(Some(n))` on success.
    /// - `Ok(None)` when the upstream kept rate limiting past the attempt
    ///   ceiling, or answered with any other non-success status.
    /// - `Err` on transport failures and malformed XML.
    pub async fn count_words(
        &self,
        date: &str,
        title: u32,
        chapter: &str,
    ) -> Result<Option<u64>, CounterError> {
        let query = ContentQuery::new(chapter);
        let fetched = with_backoff(&self.policy, &self.tracker, || {
            self.client.get_chapter_xml(date, title, &query)
        })
        .await;

        match fetched {
            Ok(xml) => Ok(Some(count_off_runtime(xml).await?)),
            Err(ecfr_api::Error::RateLimited) => {
                tracing::warn!(
                    "Exceeded retries for Title {}, Chapter {}. Skipping.",
                    title,
                    chapter
                );
                Ok(None)
            }
            Err(ecfr_api::Error::HttpStatus { status, .. }) => {
                tracing::warn!(
                    "Failed to fetch XML for Title {}, Chapter {}. Status Code: {}",
                    title,
                    chapter,
                    status
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn summary(&self) -> TrackerSummary {
        self.tracker.summary()
    }
}

/// Parses and counts on the blocking pool so a multi-megabyte chapter does
/// not hold an async worker for the whole parse.
async fn count_off_runtime(xml: String) -> Result<u64, CounterError> {
    tokio::task::spawn_blocking(move || count_content_words(&xml))
        .await
        .map_err(|e| CounterError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blocking_count_matches_inline_count() {
        let xml = "<DOC><P>Hello   world\n</P><H1>Title</H1></DOC>".to_string();
        assert_eq!(count_off_runtime(xml).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn blocking_count_propagates_xml_errors() {
        let err = count_off_runtime("<DOC><P>open</DOC>".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CounterError::Xml(_)));
    }
}
