use thiserror::Error;

use crate::provider::{ProviderError, ResponseParseError};

/// Why a provider produced no usable ranking. Every variant moves the search on to
/// the next provider.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("unparseable ranking: {0}")]
    Parse(#[from] ResponseParseError),

    #[error("ranking selected no valid candidates")]
    NoResults,
}
