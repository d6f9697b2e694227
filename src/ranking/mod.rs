//! Relevance ranking of filtered candidates.
//!
//! [`rank`] asks a provider to pick and score candidates over a minimal payload and
//! correlates its reply by positional id. [`keyword_rank`] is the deterministic fallback
//! when no provider produced a usable ranking.

pub mod error;
pub mod keyword;
pub mod ranker;
pub mod types;


pub use error::RankingError;
pub use keyword::keyword_rank;
pub use ranker::{parse_ranking, rank};
pub use types::{Highlight, ReferenceResult, sort_by_confidence};
