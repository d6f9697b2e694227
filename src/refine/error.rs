use thiserror::Error;

use crate::provider::{ProviderError, ResponseParseError};

#[derive(Debug, Error)]
pub enum RefineError {
    #[error("provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("unparseable refinement: {0}")]
    Parse(#[from] ResponseParseError),
}
