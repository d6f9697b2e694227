//! Reference store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and validating the reference dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Dataset file could not be read.
    #[error("failed to read reference dataset '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset is not a JSON array of references.
    #[error("failed to parse reference dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Dataset contains no records at all.
    #[error("reference dataset is empty")]
    Empty,

    /// A record has a blank quote.
    #[error("reference #{index} ({customer}) has an empty referenceDetail")]
    EmptyQuote { index: usize, customer: String },
}
