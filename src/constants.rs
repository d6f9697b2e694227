//! Cross-cutting, shared constants.
//!
//! Prefer referencing these over repeating literals; several stages agree on the same
//! confidence bounds and result limits.

/// Upper bound of every confidence score.
pub const MAX_CONFIDENCE: u8 = 100;

/// Number of results returned after refinement unless configured otherwise.
pub const DEFAULT_RESULTS_LIMIT: usize = 5;

/// Number of synthetic results produced in demo mode unless configured otherwise.
pub const DEFAULT_DEMO_RESULTS: usize = 5;

/// Per-call timeout for ranking capabilities, in milliseconds.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 30_000;

/// The ranking capability is asked to pick between these many candidates.
pub const RANK_SELECT_MIN: usize = 3;
pub const RANK_SELECT_MAX: usize = 8;

/// Keyword fallback: tokens must be longer than this (in chars) to count.
pub const KEYWORD_MIN_TOKEN_CHARS: usize = 3;
/// Keyword fallback: confidence ceiling.
pub const KEYWORD_MAX_CONFIDENCE: u8 = 98;
/// Keyword fallback: confidence floor for any candidate with at least one match.
pub const KEYWORD_MIN_CONFIDENCE: u8 = 60;
/// Keyword fallback: maximum number of results.
pub const KEYWORD_MAX_RESULTS: usize = 5;

/// Maximum number of highlights attached to a single result.
pub const MAX_HIGHLIGHTS: usize = 3;
/// Relevance tag attached to every verified highlight.
pub const HIGHLIGHT_RELEVANCE: &str = "high";

/// Rule-based industry inference: max distance (chars) between the industry name and
/// the words "industry"/"sector".
pub const INDUSTRY_PROXIMITY_CHARS: usize = 20;

/// Demo confidence band when filters narrowed the sample.
pub const DEMO_FILTERED_CONFIDENCE: (u8, u8) = (80, 95);
/// Demo confidence band for an unfiltered sample.
pub const DEMO_UNFILTERED_CONFIDENCE: (u8, u8) = (65, 99);

/// Clamps an arbitrary model-provided score to an integer confidence in `[0, 100]`.
///
/// Non-finite values map to `0`.
pub fn clamp_confidence(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(MAX_CONFIDENCE)) as u8
}
