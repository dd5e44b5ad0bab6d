//! Library layer for the eCFR word counter: the incremental fetch-and-count
//! pipeline and the pieces around it.
//!
//! Wraps the `ecfr_api` client with rate-limit backoff, XML word counting,
//! change detection against an amendment-date cache, a bounded concurrent
//! pipeline, and the CSV ledger sink.

pub mod agencies;
pub mod cache;
pub mod config;
pub mod counter;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod model;
pub mod pipeline;
pub mod reference_date;
pub mod retry;
pub mod search;
pub mod validation;
pub mod word_count;

pub use ecfr_api;
pub use ecfr_api::types;
pub use ecfr_api::Client;

pub use agencies::{fetch_agency_snapshot, flatten_agencies, load_agencies, save_agencies};
pub use cache::AmendmentCache;
pub use config::PipelineConfig;
pub use counter::ChapterCounter;
pub use error::CounterError;
pub use filter::should_recount;
pub use ledger::{commit, read_ledger, totals_by_agency, AgencyTotal};
pub use model::{Agency, Reference, WordCountResult};
pub use pipeline::{refresh, run_pipeline, PipelineOutput, RefreshReport, RunStats};
pub use reference_date::resolve_reference_date;
pub use retry::{RequestTracker, RetryPolicy, TrackerSummary};
pub use search::{search_word_occurrences, SearchSummary};
