//! Query interpretation: abbreviation expansion, assisted clarification and filter
//! inference, with a rule-based fallback.
//!
//! Interpretation never fails a search. Any provider error, unparseable reply or schema
//! mismatch falls back to [`InferenceRules`], whose optimized query is the expanded
//! description verbatim.

pub mod error;
pub mod prompt;
pub mod rules;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::InterpretError;
pub use rules::InferenceRules;
pub use types::{EnhancedReferenceRequest, InterpretationSource};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::catalog::{AbbreviationExpander, EntityTables};
use crate::provider::json::parse_json_object;
use crate::provider::{CompletionProvider, CompletionRequest, CompletionStage};
use crate::search::ReferenceRequest;
use crate::store::ReferenceFilter;

use prompt::{InterpretationResponse, build_prompt};

#[derive(Debug)]
pub struct QueryInterpreter {
    expander: AbbreviationExpander,
    tables: Arc<EntityTables>,
    rules: InferenceRules,
}

struct Assisted {
    description: String,
    optimized_query: String,
    inferred: ReferenceFilter,
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.trim().to_string())
}

impl QueryInterpreter {
    pub fn new(tables: Arc<EntityTables>) -> Self {
        let rules = InferenceRules::new(&tables);
        Self {
            expander: AbbreviationExpander::new(),
            tables,
            rules,
        }
    }

    pub fn tables(&self) -> &EntityTables {
        &self.tables
    }

    /// Interprets with the given provider, falling back to rules when it is absent or
    /// fails.
    #[instrument(skip_all, fields(provider = provider.map(|p| p.kind().as_str())))]
    pub async fn interpret(
        &self,
        request: &ReferenceRequest,
        provider: Option<&dyn CompletionProvider>,
    ) -> EnhancedReferenceRequest {
        let user_filters = self.tables.canonicalize(&request.filters);
        let expanded = self.expander.expand(&request.description);
        debug!(expanded = %expanded, "Expanded abbreviations");

        if let Some(provider) = provider {
            match self.assist(&expanded, &user_filters, provider).await {
                Ok(assisted) => {
                    let filters = user_filters.merged_with(&assisted.inferred);
                    info!(kind = %provider.kind(), ?filters, "Assisted interpretation");
                    return EnhancedReferenceRequest {
                        original: request.clone(),
                        description: assisted.description,
                        optimized_query: assisted.optimized_query,
                        filters,
                        source: InterpretationSource::Assisted(provider.kind()),
                    };
                }
                Err(e) => {
                    warn!(kind = %provider.kind(), error = %e, "Assisted interpretation failed; using rules");
                }
            }
        }

        self.rule_based(request, user_filters, expanded)
    }

    /// Rule-based interpretation only. No network access.
    pub fn interpret_offline(&self, request: &ReferenceRequest) -> EnhancedReferenceRequest {
        let user_filters = self.tables.canonicalize(&request.filters);
        let expanded = self.expander.expand(&request.description);
        self.rule_based(request, user_filters, expanded)
    }

    fn rule_based(
        &self,
        request: &ReferenceRequest,
        user_filters: ReferenceFilter,
        expanded: String,
    ) -> EnhancedReferenceRequest {
        let inferred = self.rules.infer(&expanded, &user_filters);
        let filters = user_filters.merged_with(&inferred);
        debug!(?filters, "Rule-based interpretation");

        EnhancedReferenceRequest {
            original: request.clone(),
            description: expanded.clone(),
            optimized_query: expanded,
            filters,
            source: InterpretationSource::RuleBased,
        }
    }

    async fn assist(
        &self,
        expanded: &str,
        user_filters: &ReferenceFilter,
        provider: &dyn CompletionProvider,
    ) -> Result<Assisted, InterpretError> {
        let prompt = build_prompt(expanded, user_filters, &self.tables);
        let text = provider
            .complete(CompletionRequest::new(CompletionStage::Interpret, prompt))
            .await?;
        let response: InterpretationResponse = parse_json_object(&text)?;

        let description =
            non_blank(response.improved_description).unwrap_or_else(|| expanded.to_string());
        let optimized_query =
            non_blank(response.optimized_query).unwrap_or_else(|| description.clone());

        Ok(Assisted {
            description,
            optimized_query,
            inferred: response.inferred_filters.validated(&self.tables),
        })
    }
}
