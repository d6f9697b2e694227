use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interpreter::InterpretationSource;
use crate::provider::ProviderKind;
use crate::ranking::ReferenceResult;
use crate::store::ReferenceFilter;

/// A sales rep's search: free text plus optional structured narrowing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceRequest {
    pub description: String,
    pub filters: ReferenceFilter,
    pub demo_mode: bool,
    /// `None` uses the configured default provider.
    pub ai_provider: Option<ProviderKind>,
}

impl ReferenceRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: ReferenceFilter) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.ai_provider = Some(provider);
        self
    }
}

/// Stage that produced the final ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingSource {
    /// Synthetic demo results.
    Demo,
    /// No candidates survived filtering.
    None,
    Provider(ProviderKind),
    /// Every provider failed or none was configured.
    Keyword,
}

impl RankingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingSource::Demo => "demo",
            RankingSource::None => "none",
            RankingSource::Provider(kind) => kind.as_str(),
            RankingSource::Keyword => "keyword",
        }
    }
}

impl fmt::Display for RankingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<ReferenceResult>,
    pub ranking: RankingSource,
    pub refined: bool,
    pub interpretation: InterpretationSource,
}
