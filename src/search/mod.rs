//! Search orchestration.
//!
//! One linear pipeline per request:
//!
//! ```text
//! validate → interpret → (demo → generate)
//!          → filter → (no candidates → [])
//!          → rank: requested provider, other configured providers, keyword fallback
//!          → refine (original description, ranking provider) → approval guard
//! ```
//!
//! Provider failures never fail a search. Each provider is tried at most once per
//! stage; the keyword fallback always produces an answer and skips refinement.

pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::SearchError;
pub use types::{RankingSource, ReferenceRequest, SearchOutcome};

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::catalog::EntityTables;
use crate::config::Config;
use crate::constants::{DEFAULT_DEMO_RESULTS, DEFAULT_RESULTS_LIMIT};
use crate::demo;
use crate::interpreter::{InterpretationSource, QueryInterpreter};
use crate::provider::{ProviderKind, ProviderRegistry};
use crate::ranking::{ReferenceResult, keyword_rank, rank};
use crate::refine::refine;
use crate::store::{CustomerReference, ReferenceStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Provider used when a request names none.
    pub default_provider: ProviderKind,
    pub results_limit: usize,
    pub demo_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::Anthropic,
            results_limit: DEFAULT_RESULTS_LIMIT,
            demo_results: DEFAULT_DEMO_RESULTS,
        }
    }
}

impl From<&Config> for SearchSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_provider: config.default_provider,
            results_limit: config.results_limit,
            demo_results: config.demo_results,
        }
    }
}

#[derive(Debug)]
pub struct SearchService {
    store: Arc<ReferenceStore>,
    tables: Arc<EntityTables>,
    interpreter: QueryInterpreter,
    providers: ProviderRegistry,
    settings: SearchSettings,
}

impl SearchService {
    pub fn new(store: Arc<ReferenceStore>, providers: ProviderRegistry, settings: SearchSettings) -> Self {
        let tables = Arc::new(EntityTables::from_store(&store));
        Self {
            interpreter: QueryInterpreter::new(tables.clone()),
            store,
            tables,
            providers,
            settings,
        }
    }

    /// Loads the configured dataset (or the bundled one) and registers every provider
    /// whose API key is present.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let store = match config.data_path {
            Some(ref path) => ReferenceStore::load(path)?,
            None => ReferenceStore::bundled()?,
        };
        let providers = ProviderRegistry::from_config(config);
        info!(
            references = store.len(),
            approved = store.approved_count(),
            providers = ?providers.kinds(),
            "Search service ready"
        );
        Ok(Self::new(Arc::new(store), providers, SearchSettings::from(config)))
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    pub fn tables(&self) -> &EntityTables {
        &self.tables
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Ranked, refined references for `request`.
    pub async fn find_references(
        &self,
        request: &ReferenceRequest,
    ) -> Result<Vec<ReferenceResult>, SearchError> {
        self.search(request).await.map(|outcome| outcome.results)
    }

    /// Like [`find_references`](Self::find_references), also reporting which stage
    /// produced the ranking and whether refinement applied.
    #[instrument(skip_all, fields(demo = request.demo_mode, requested = ?request.ai_provider))]
    pub async fn search(&self, request: &ReferenceRequest) -> Result<SearchOutcome, SearchError> {
        if !request.demo_mode && request.description.trim().is_empty() {
            warn!("Rejecting request with empty description");
            return Err(SearchError::EmptyDescription);
        }

        if request.demo_mode {
            return Ok(self.demo(request));
        }

        let requested = request.ai_provider.unwrap_or(self.settings.default_provider);
        let primary = self.providers.primary(requested);

        let enhanced = self.interpreter.interpret(request, primary.as_deref()).await;
        let candidates = self.store.filter_candidates(&enhanced.filters);

        if candidates.is_empty() {
            info!(filters = ?enhanced.filters, "No candidates match filters");
            return Ok(SearchOutcome {
                results: Vec::new(),
                ranking: RankingSource::None,
                refined: false,
                interpretation: enhanced.source,
            });
        }

        let (ranked, ranking) = self
            .rank_with_fallback(&enhanced.optimized_query, &candidates, requested)
            .await;

        // Refinement goes to whichever provider produced the ranking; after a keyword
        // fallback every configured provider has already failed in this search.
        let refiner = match ranking {
            RankingSource::Provider(kind) => self.providers.get(kind),
            _ => None,
        };

        let (results, refined) = match refiner {
            Some(provider) if !ranked.is_empty() => {
                let outcome = refine(
                    provider.as_ref(),
                    &request.description,
                    ranked,
                    self.settings.results_limit,
                )
                .await;
                (outcome.results, outcome.refined)
            }
            _ => {
                let mut ranked = ranked;
                ranked.truncate(self.settings.results_limit);
                (ranked, false)
            }
        };

        let results = approved_only(results);
        info!(
            results = results.len(),
            ranking = %ranking,
            refined,
            interpretation = %enhanced.source,
            "Search complete"
        );

        Ok(SearchOutcome {
            results,
            ranking,
            refined,
            interpretation: enhanced.source,
        })
    }

    async fn rank_with_fallback(
        &self,
        query: &str,
        candidates: &[CustomerReference],
        requested: ProviderKind,
    ) -> (Vec<ReferenceResult>, RankingSource) {
        for provider in self.providers.attempt_order(requested) {
            match rank(provider.as_ref(), query, candidates).await {
                Ok(results) => return (results, RankingSource::Provider(provider.kind())),
                Err(e) => {
                    warn!(kind = %provider.kind(), error = %e, "Ranking provider failed; trying next");
                }
            }
        }

        warn!(candidates = candidates.len(), "No provider ranking available; using keyword fallback");
        (keyword_rank(query, candidates), RankingSource::Keyword)
    }

    fn demo(&self, request: &ReferenceRequest) -> SearchOutcome {
        let enhanced = self.interpreter.interpret_offline(request);
        let candidates = self.store.filter_candidates(&enhanced.filters);
        let approved: Vec<CustomerReference> = self.store.approved().cloned().collect();
        let filtered = !enhanced.filters.is_empty();

        let results = demo::generate(
            &candidates,
            &approved,
            self.settings.demo_results,
            filtered,
            &mut rand::thread_rng(),
        );
        info!(results = results.len(), filtered, "Demo search complete");

        SearchOutcome {
            results: approved_only(results),
            ranking: RankingSource::Demo,
            refined: false,
            interpretation: InterpretationSource::RuleBased,
        }
    }
}

fn approved_only(mut results: Vec<ReferenceResult>) -> Vec<ReferenceResult> {
    let before = results.len();
    results.retain(ReferenceResult::is_approved);
    if results.len() != before {
        warn!(dropped = before - results.len(), "Dropped unapproved references from results");
    }
    results
}
