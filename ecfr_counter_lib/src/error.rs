//! Error types for the library layer.

use std::path::PathBuf;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding file, serialization, XML, and input validation failures.
#[derive(thiserror::Error, Debug)]
pub enum CounterError {
    /// An error from the underlying API client.
    #[error("API error: {0}")]
    Api(#[from] ecfr_api::Error),
    /// Reading or writing a local file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Reading or writing the CSV ledger failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A content document was not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),
    /// The agency snapshot parsed but contained no agencies.
    #[error("No agency data found")]
    NoAgencies,
    /// The title listing produced no usable as-of date.
    #[error("No valid reference date found")]
    NoReferenceDate,
    /// A background task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(String),
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CounterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<quick_xml::Error> for CounterError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}
