use thiserror::Error;

use crate::provider::{ProviderError, ResponseParseError};

/// Reasons assisted interpretation was abandoned for the rule-based path.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("unusable interpretation: {0}")]
    Parse(#[from] ResponseParseError),
}
