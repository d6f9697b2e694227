//! Synthetic results for demo mode. No provider is contacted.


use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::constants::{DEMO_FILTERED_CONFIDENCE, DEMO_UNFILTERED_CONFIDENCE};
use crate::ranking::{ReferenceResult, sort_by_confidence};
use crate::store::CustomerReference;

/// Builds up to `count` demo results.
///
/// When `filtered` is set and `candidates` is non-empty, the first `count` candidates are
/// used with confidences in the filtered band. Otherwise a random sample of `approved`
/// is drawn with confidences in the wider unfiltered band. Unapproved records are never
/// used.
pub fn generate<R: Rng + ?Sized>(
    candidates: &[CustomerReference],
    approved: &[CustomerReference],
    count: usize,
    filtered: bool,
    rng: &mut R,
) -> Vec<ReferenceResult> {
    let (picked, (low, high)): (Vec<&CustomerReference>, _) = if filtered && !candidates.is_empty() {
        let picked = candidates
            .iter()
            .filter(|r| r.approved_for_public_use)
            .take(count)
            .collect();
        (picked, DEMO_FILTERED_CONFIDENCE)
    } else {
        let pool: Vec<&CustomerReference> = approved
            .iter()
            .filter(|r| r.approved_for_public_use)
            .collect();
        let picked = pool.choose_multiple(rng, count).copied().collect();
        (picked, DEMO_UNFILTERED_CONFIDENCE)
    };

    debug!(picked = picked.len(), filtered, "Generating demo results");

    let mut results: Vec<ReferenceResult> = picked
        .into_iter()
        .map(|reference| ReferenceResult::new(reference.clone(), rng.gen_range(low..=high)))
        .collect();

    sort_by_confidence(&mut results);
    results
}
