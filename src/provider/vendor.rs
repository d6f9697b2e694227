use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, warn};

use super::{CompletionProvider, CompletionRequest, ProviderError, ProviderKind, ProviderResult};

/// A single vendor reached through the shared `genai` client.
///
/// The client picks the vendor adapter from the model name and reads the vendor key
/// from the environment.
#[derive(Clone)]
pub struct GenaiProvider {
    client: Client,
    kind: ProviderKind,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiProvider")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenaiProvider {
    pub fn new(client: Client, kind: ProviderKind, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            kind,
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for GenaiProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String> {
        let chat_req = ChatRequest::new(vec![ChatMessage::user(request.prompt)]);
        let options = ChatOptions::default()
            .with_temperature(request.temperature)
            .with_max_tokens(request.max_tokens);

        debug!(
            kind = %self.kind,
            model = %self.model,
            stage = request.stage.as_str(),
            "Sending completion request"
        );

        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, chat_req, Some(&options)),
        )
        .await
        .map_err(|_| {
            warn!(kind = %self.kind, timeout = ?self.timeout, "Provider timed out");
            ProviderError::Timeout {
                kind: self.kind,
                timeout: self.timeout,
            }
        })?
        .map_err(|e| ProviderError::Request {
            kind: self.kind,
            message: e.to_string(),
        })?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(ProviderError::EmptyResponse { kind: self.kind }),
        }
    }
}
