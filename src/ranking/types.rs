use serde::{Deserialize, Serialize};

use crate::constants::HIGHLIGHT_RELEVANCE;
use crate::store::CustomerReference;

/// Verbatim fragment of a quote that supports the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub text: String,
    pub relevance: String,
}

impl Highlight {
    pub fn high(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            relevance: HIGHLIGHT_RELEVANCE.to_string(),
        }
    }
}

/// A ranked reference. Serialized flat: reference fields plus `confidence` and
/// `highlights`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResult {
    #[serde(flatten)]
    pub reference: CustomerReference,
    /// Estimated relevance in `[0, 100]`.
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<Highlight>>,
}

impl ReferenceResult {
    pub fn new(reference: CustomerReference, confidence: u8) -> Self {
        Self {
            reference,
            confidence,
            highlights: None,
        }
    }

    pub fn customer_name(&self) -> &str {
        &self.reference.customer_name
    }

    pub fn is_approved(&self) -> bool {
        self.reference.approved_for_public_use
    }
}

/// Stable sort, highest confidence first.
pub fn sort_by_confidence(results: &mut [ReferenceResult]) {
    results.sort_by(|a, b| b.confidence.cmp(&a.confidence));
}
