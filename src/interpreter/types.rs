use std::fmt;

use crate::provider::ProviderKind;
use crate::search::ReferenceRequest;
use crate::store::ReferenceFilter;

/// How a request was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretationSource {
    Assisted(ProviderKind),
    RuleBased,
}

impl fmt::Display for InterpretationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpretationSource::Assisted(kind) => write!(f, "assisted:{kind}"),
            InterpretationSource::RuleBased => f.write_str("rule-based"),
        }
    }
}

/// A request after interpretation. Lives for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedReferenceRequest {
    pub original: ReferenceRequest,
    /// Clarified description (abbreviations expanded, possibly rewritten).
    pub description: String,
    /// Text the ranker scores against.
    pub optimized_query: String,
    /// User filters merged with validated inferred filters; user values win.
    pub filters: ReferenceFilter,
    pub source: InterpretationSource,
}
