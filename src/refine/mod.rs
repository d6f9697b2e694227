//! Best-effort re-scoring and highlight extraction.
//!
//! The refiner scores against the rep's original wording, not the optimized query. A
//! highlight survives only if it is an exact substring of its quote. Any failure leaves
//! the ranked results as they were, truncated to the limit.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::RefineError;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::constants::{MAX_HIGHLIGHTS, clamp_confidence};
use crate::provider::json::parse_json_array;
use crate::provider::{CompletionProvider, CompletionRequest, CompletionStage};
use crate::ranking::{Highlight, ReferenceResult, sort_by_confidence};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefinePayload<'a> {
    id: usize,
    company: &'a str,
    quote: &'a str,
    use_case: &'a str,
    industry: &'a str,
    market_segment: &'a str,
    current_confidence: u8,
}

/// One entry of the provider's reply, keyed by the result's position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refinement {
    pub id: i64,
    #[serde(default)]
    pub revised_confidence: Option<f64>,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefineOutcome {
    pub results: Vec<ReferenceResult>,
    /// `false` when the pre-refinement results were returned.
    pub refined: bool,
}

fn build_prompt(original_request: &str, results: &[ReferenceResult]) -> String {
    let payload: Vec<RefinePayload<'_>> = results
        .iter()
        .enumerate()
        .map(|(id, result)| RefinePayload {
            id,
            company: &result.reference.customer_name,
            quote: &result.reference.reference_detail,
            use_case: &result.reference.use_case,
            industry: &result.reference.industry,
            market_segment: &result.reference.market_segment,
            current_confidence: result.confidence,
        })
        .collect();
    let results_json = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are an expert in analyzing customer references for a marketing automation vendor.
The sales rep's original search request was: "{original_request}"

Analyze these search results to:
1. Re-evaluate the confidence score (0-100) for each reference based on how well it truly addresses the original request
2. Identify 1-{MAX_HIGHLIGHTS} very concise key phrases within each quote that directly address the request
3. Give higher confidence to references that mention the exact features requested, even if terminology varies slightly

Use the sales rep's original request as the basis for evaluation, not any inferred or optimized version.

Search results:
{results_json}

For each reference, provide:
- id: the reference id from the input
- revisedConfidence: your refined confidence score (0-100)
- highlights: an array of 0-{MAX_HIGHLIGHTS} text fragments copied from the quote

Highlight rules:
1. Each highlight MUST be an EXACT substring of the quote, unchanged, including punctuation and capitalization
2. Keep highlights to 2-5 words; for metrics extract only the measurement (e.g. "45-60%")
3. Choose fragments that address what the rep was actually looking for

Respond with ONLY a JSON array in this format:
[{{"id": 0, "revisedConfidence": 92, "highlights": ["45-60%"]}}]"#
    )
}

/// Highlights that are non-blank, distinct exact substrings of `quote`, at most
/// [`MAX_HIGHLIGHTS`] of them.
pub fn verified_highlights(quote: &str, candidates: &[String]) -> Vec<Highlight> {
    let mut kept: Vec<Highlight> = Vec::new();
    for text in candidates {
        if kept.len() == MAX_HIGHLIGHTS {
            break;
        }
        if text.trim().is_empty() || !quote.contains(text.as_str()) {
            debug!(highlight = %text, "Dropping unverifiable highlight");
            continue;
        }
        if kept.iter().any(|h| h.text == *text) {
            continue;
        }
        kept.push(Highlight::high(text.clone()));
    }
    kept
}

/// Applies refinements by positional id, then sorts and truncates to `limit`.
///
/// A result without a refinement is unchanged. A missing or zero revised confidence
/// keeps the original score.
pub fn apply_refinements(
    results: Vec<ReferenceResult>,
    refinements: &[Refinement],
    limit: usize,
) -> Vec<ReferenceResult> {
    let mut refined: Vec<ReferenceResult> = results
        .into_iter()
        .enumerate()
        .map(|(index, mut result)| {
            let Some(refinement) = refinements
                .iter()
                .find(|r| usize::try_from(r.id).is_ok_and(|id| id == index))
            else {
                debug!(customer = %result.customer_name(), "No refinement; keeping original");
                return result;
            };

            let revised = refinement.revised_confidence.map(clamp_confidence).unwrap_or(0);
            if revised > 0 {
                result.confidence = revised;
            }

            let highlights = refinement
                .highlights
                .as_deref()
                .map(|texts| verified_highlights(&result.reference.reference_detail, texts))
                .unwrap_or_default();
            result.highlights = (!highlights.is_empty()).then_some(highlights);

            result
        })
        .collect();

    sort_by_confidence(&mut refined);
    refined.truncate(limit);
    refined
}

async fn try_refine(
    provider: &dyn CompletionProvider,
    original_request: &str,
    results: &[ReferenceResult],
) -> Result<Vec<Refinement>, RefineError> {
    let prompt = build_prompt(original_request, results);
    let text = provider
        .complete(CompletionRequest::new(CompletionStage::Refine, prompt))
        .await?;
    Ok(parse_json_array(&text)?)
}

/// Re-scores `results` against `original_request` and attaches verified highlights.
#[instrument(skip_all, fields(kind = %provider.kind(), results = results.len(), limit = limit))]
pub async fn refine(
    provider: &dyn CompletionProvider,
    original_request: &str,
    mut results: Vec<ReferenceResult>,
    limit: usize,
) -> RefineOutcome {
    if results.is_empty() {
        return RefineOutcome {
            results,
            refined: false,
        };
    }

    match try_refine(provider, original_request, &results).await {
        Ok(refinements) => {
            let results = apply_refinements(results, &refinements, limit);
            info!(returned = results.len(), "Refinement applied");
            RefineOutcome {
                results,
                refined: true,
            }
        }
        Err(e) => {
            warn!(error = %e, "Refinement failed; returning ranked results");
            results.truncate(limit);
            RefineOutcome {
                results,
                refined: false,
            }
        }
    }
}
