//! Ranking capability: a narrow text-completion contract and its vendor adapters.
//!
//! Every pipeline stage talks to a [`CompletionProvider`]. Production providers are
//! [`GenaiProvider`]s (one per configured vendor, sharing a `genai::Client`); tests use
//! `ScriptedProvider` from the `mock` module.

pub mod error;
pub mod json;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod vendor;


use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

pub use error::{ProviderError, ProviderResult};
pub use json::ResponseParseError;
#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedProvider;
pub use vendor::GenaiProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Anthropic,
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// Fixed fallback priority.
    pub const PRIORITY: [ProviderKind; 3] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenAi,
        ProviderKind::Gemini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Vendor key that marks the provider as configured.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }

    fn priority(&self) -> usize {
        match self {
            ProviderKind::Anthropic => 0,
            ProviderKind::OpenAi => 1,
            ProviderKind::Gemini => 2,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}

/// Pipeline stage a completion is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionStage {
    Interpret,
    Rank,
    Refine,
}

impl CompletionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStage::Interpret => "interpret",
            CompletionStage::Rank => "rank",
            CompletionStage::Refine => "refine",
        }
    }

    pub fn default_temperature(&self) -> f64 {
        match self {
            CompletionStage::Interpret | CompletionStage::Refine => 0.1,
            CompletionStage::Rank => 0.2,
        }
    }

    pub fn default_max_tokens(&self) -> u32 {
        match self {
            CompletionStage::Interpret => 500,
            CompletionStage::Rank | CompletionStage::Refine => 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub stage: CompletionStage,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Request with the stage's default sampling settings.
    pub fn new(stage: CompletionStage, prompt: impl Into<String>) -> Self {
        Self {
            stage,
            prompt: prompt.into(),
            temperature: stage.default_temperature(),
            max_tokens: stage.default_max_tokens(),
        }
    }
}

/// Instruction in, free text out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String>;
}

/// Configured providers, held in priority order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn CompletionProvider>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.kinds())
            .finish()
    }
}

impl ProviderRegistry {
    /// Sorts by priority; a second provider of the same kind is ignored.
    pub fn new(providers: Vec<Arc<dyn CompletionProvider>>) -> Self {
        let mut unique: Vec<Arc<dyn CompletionProvider>> = Vec::with_capacity(providers.len());
        for provider in providers {
            if unique.iter().any(|p| p.kind() == provider.kind()) {
                debug!(kind = %provider.kind(), "Ignoring duplicate provider");
                continue;
            }
            unique.push(provider);
        }
        unique.sort_by_key(|p| p.kind().priority());
        Self { providers: unique }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// One [`GenaiProvider`] per vendor whose API key is present.
    pub fn from_config(config: &Config) -> Self {
        let client = ::genai::Client::default();
        let providers = config
            .configured_providers()
            .iter()
            .map(|&kind| {
                Arc::new(GenaiProvider::new(
                    client.clone(),
                    kind,
                    config.model_for(kind),
                    config.provider_timeout,
                )) as Arc<dyn CompletionProvider>
            })
            .collect();
        Self::new(providers)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn CompletionProvider>> {
        self.providers.iter().find(|p| p.kind() == kind).cloned()
    }

    /// The requested provider (when configured) followed by the remaining configured
    /// providers in priority order. Each provider appears once.
    pub fn attempt_order(&self, requested: ProviderKind) -> Vec<Arc<dyn CompletionProvider>> {
        let mut order: Vec<Arc<dyn CompletionProvider>> = Vec::with_capacity(self.providers.len());
        if let Some(first) = self.get(requested) {
            order.push(first);
        }
        order.extend(
            self.providers
                .iter()
                .filter(|p| p.kind() != requested)
                .cloned(),
        );
        order
    }

    /// First entry of [`attempt_order`](Self::attempt_order).
    pub fn primary(&self, requested: ProviderKind) -> Option<Arc<dyn CompletionProvider>> {
        self.get(requested).or_else(|| self.providers.first().cloned())
    }
}
