//! Customer reference search library (used by the server binary and integration tests).
//!
//! A request carries a free-text description and optional structured filters. The
//! pipeline expands sales shorthand, interprets the request (assisted by a completion
//! provider when one is configured, rule-based otherwise), narrows the approved
//! references by filter, ranks the survivors and attaches verbatim highlight quotes.
//!
//! ## Modules
//! - [`catalog`]: abbreviation table and enumerated filter values
//! - [`store`]: the reference dataset and candidate filtering
//! - [`provider`]: completion providers and the fallback registry
//! - [`interpreter`], [`ranking`], [`refine`]: the three assisted stages
//! - [`demo`]: synthetic results for demo mode
//! - [`search`]: the orchestrating [`SearchService`]
//! - [`gateway`]: Axum HTTP surface
//!
//! ## Test/Mock Support
//! [`provider::ScriptedProvider`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod demo;
pub mod gateway;
pub mod interpreter;
pub mod provider;
pub mod ranking;
pub mod refine;
pub mod search;
pub mod store;

pub use catalog::{AbbreviationExpander, EntityKind, EntityTables};
pub use config::{Config, ConfigError};
pub use interpreter::{EnhancedReferenceRequest, InterpretationSource, QueryInterpreter};
pub use provider::{
    CompletionProvider, CompletionRequest, CompletionStage, ProviderError, ProviderKind,
    ProviderRegistry,
};
#[cfg(any(test, feature = "mock"))]
pub use provider::ScriptedProvider;
pub use ranking::{Highlight, ReferenceResult};
pub use search::{
    RankingSource, ReferenceRequest, SearchError, SearchOutcome, SearchService, SearchSettings,
};
pub use store::{CustomerReference, ReferenceFilter, ReferenceStore, StoreError};
