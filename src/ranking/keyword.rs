use crate::constants::{
    KEYWORD_MAX_CONFIDENCE, KEYWORD_MAX_RESULTS, KEYWORD_MIN_CONFIDENCE, KEYWORD_MIN_TOKEN_CHARS,
};
use crate::store::CustomerReference;

use super::types::{ReferenceResult, sort_by_confidence};

/// Deterministic keyword-overlap ranking used when every provider failed.
///
/// The query is split on whitespace and lowercased; tokens keep their punctuation.
/// Only tokens longer than three characters can match (against the quote, use case,
/// capability or customer name), but the score divides by every token. Confidence is
/// that share floored at 60 and capped at 98. Candidates without a single match are
/// dropped; at most five are returned.
pub fn keyword_rank(query: &str, candidates: &[CustomerReference]) -> Vec<ReferenceResult> {
    let query = query.to_lowercase();
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let total = tokens.len().max(1);
    let significant: Vec<&str> = tokens
        .into_iter()
        .filter(|token| token.chars().count() > KEYWORD_MIN_TOKEN_CHARS)
        .collect();
    if significant.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<ReferenceResult> = candidates
        .iter()
        .filter_map(|reference| {
            let haystack = format!(
                "{} {} {} {}",
                reference.reference_detail,
                reference.use_case,
                reference.capability,
                reference.customer_name
            )
            .to_lowercase();

            let matches = significant.iter().filter(|t| haystack.contains(*t)).count();
            if matches == 0 {
                return None;
            }

            let share = (matches as f64 / total as f64 * 100.0).round() as u8;
            let confidence = share.clamp(KEYWORD_MIN_CONFIDENCE, KEYWORD_MAX_CONFIDENCE);
            Some(ReferenceResult::new(reference.clone(), confidence))
        })
        .collect();

    sort_by_confidence(&mut results);
    results.truncate(KEYWORD_MAX_RESULTS);
    results
}
