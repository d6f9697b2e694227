use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Non-demo request with a blank description. Raised before any filtering or
    /// provider call.
    #[error("description must not be empty")]
    EmptyDescription,

    #[error("failed to load references: {0}")]
    Store(#[from] StoreError),
}

impl SearchError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::EmptyDescription => "empty_description",
            SearchError::Store(_) => "store_unavailable",
        }
    }
}
