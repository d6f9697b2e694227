use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{RANK_SELECT_MAX, RANK_SELECT_MIN, clamp_confidence};
use crate::provider::json::parse_json_array;
use crate::provider::{CompletionProvider, CompletionRequest, CompletionStage};
use crate::store::CustomerReference;

use super::error::RankingError;
use super::types::{ReferenceResult, sort_by_confidence};

/// Fields the provider sees for each candidate. `id` is the candidate's position in the
/// slice passed to [`rank`] and is how the reply is correlated back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePayload<'a> {
    id: usize,
    customer_name: &'a str,
    industry: &'a str,
    market_segment: &'a str,
    use_case: &'a str,
    capability: &'a str,
    reference_detail: &'a str,
    crm: &'a str,
}

impl<'a> CandidatePayload<'a> {
    fn new(id: usize, reference: &'a CustomerReference) -> Self {
        Self {
            id,
            customer_name: &reference.customer_name,
            industry: &reference.industry,
            market_segment: &reference.market_segment,
            use_case: &reference.use_case,
            capability: &reference.capability,
            reference_detail: &reference.reference_detail,
            crm: &reference.crm,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RankedEntry {
    id: i64,
    confidence: f64,
}

fn build_prompt(query: &str, candidates: &[CustomerReference]) -> String {
    let payload: Vec<CandidatePayload<'_>> = candidates
        .iter()
        .enumerate()
        .map(|(id, reference)| CandidatePayload::new(id, reference))
        .collect();
    let candidates_json =
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Find the most relevant customer references for this request: "{query}".

Available customer references:
{candidates_json}

Select the {RANK_SELECT_MIN}-{RANK_SELECT_MAX} most relevant references (fewer if fewer are available).
For each, return its "id" from the list above and a "confidence" number between 0 and 100
indicating how well the quote supports the request.

Respond with ONLY a JSON array in this format:
[{{"id": 0, "confidence": 92}}, {{"id": 3, "confidence": 81}}]

If no suitable matches are found, return an empty array."#
    )
}

/// Rehydrates `{id, confidence}` pairs into results.
///
/// Out-of-range and repeated ids are dropped; confidences are clamped to `[0, 100]`.
pub fn parse_ranking(
    text: &str,
    candidates: &[CustomerReference],
) -> Result<Vec<ReferenceResult>, RankingError> {
    let entries: Vec<RankedEntry> = parse_json_array(text)?;
    let mut seen = HashSet::new();

    let mut results: Vec<ReferenceResult> = entries
        .into_iter()
        .filter_map(|entry| {
            let index = usize::try_from(entry.id).ok()?;
            let reference = candidates.get(index)?;
            if !seen.insert(index) {
                debug!(id = index, "Dropping duplicate ranking entry");
                return None;
            }
            Some(ReferenceResult::new(
                reference.clone(),
                clamp_confidence(entry.confidence),
            ))
        })
        .collect();

    if results.is_empty() {
        return Err(RankingError::NoResults);
    }

    sort_by_confidence(&mut results);
    Ok(results)
}

/// Asks `provider` to rank `candidates` against `query`.
pub async fn rank(
    provider: &dyn CompletionProvider,
    query: &str,
    candidates: &[CustomerReference],
) -> Result<Vec<ReferenceResult>, RankingError> {
    let prompt = build_prompt(query, candidates);
    debug!(
        kind = %provider.kind(),
        candidates = candidates.len(),
        prompt_len = prompt.len(),
        "Requesting ranking"
    );

    let text = provider
        .complete(CompletionRequest::new(CompletionStage::Rank, prompt))
        .await?;

    match parse_ranking(&text, candidates) {
        Ok(results) => {
            info!(kind = %provider.kind(), results = results.len(), "Ranking complete");
            Ok(results)
        }
        Err(e) => {
            warn!(kind = %provider.kind(), error = %e, "Ranking reply unusable");
            Err(e)
        }
    }
}
