use std::time::Duration;

use thiserror::Error;

use super::ProviderKind;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider '{0}' (expected anthropic, openai or gemini)")]
    UnknownProvider(String),

    #[error("{kind} did not answer within {timeout:?}")]
    Timeout {
        kind: ProviderKind,
        timeout: Duration,
    },

    #[error("{kind} request failed: {message}")]
    Request { kind: ProviderKind, message: String },

    #[error("{kind} returned no text")]
    EmptyResponse { kind: ProviderKind },
}

pub type ProviderResult<T> = Result<T, ProviderError>;
