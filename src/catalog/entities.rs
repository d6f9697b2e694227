use serde::Serialize;
use tracing::warn;

use crate::store::{ReferenceFilter, ReferenceStore};

pub const INDUSTRIES: &[&str] = &[
    "Accounting/Financial Services",
    "Amusement Parks/Entertainment Centers",
    "Business/Consulting Services",
    "Computer & Network Security",
    "Consumer Services",
    "General Consumer Products Retail",
    "Healthcare Services",
    "Healthcare Software",
    "Insurance",
    "Marketing and Advertising Agencies",
    "Member/Association Organizations",
    "Mining",
    "Non-Profit/Charitable Organizations",
    "Other Education",
    "Other Software",
    "Parts Manufacturing",
    "Real Estate",
    "Retail Banking & Credit Unions",
    "Security Software",
    "Wealth Management Services",
];

pub const MARKET_SEGMENTS: &[&str] = &["Enterprise", "Mid Market", "SMB"];

pub const USE_CASES: &[&str] = &[
    "Customer Growth",
    "Customer Growth; Demand Gen",
    "Demand Gen",
    "Demand Gen; Sales",
    "Ease of Use",
    "Ease of Use; Onboarding",
    "Ease of Use; ROI/Value",
    "Ease of Use; Support",
    "Engagement",
    "Nurture",
    "Nurture; Onboarding",
    "Onboarding",
    "Onboarding; Support",
    "ROI/Value",
    "Support",
];

pub const CRM_TYPES: &[&str] = &[
    "CRM On Premise",
    "InHouse Solution",
    "Microsoft Dynamics",
    "NetSuite",
    "None",
    "Oracle",
    "Other",
    "SAP",
    "SalesLogix",
    "Salesforce",
    "Sugar",
    "Sugar CRM",
    "Tour de Force",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Industry,
    MarketSegment,
    UseCase,
    CrmType,
    Company,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Industry => "industry",
            EntityKind::MarketSegment => "marketSegment",
            EntityKind::UseCase => "useCase",
            EntityKind::CrmType => "crmType",
            EntityKind::Company => "company",
        }
    }
}

/// Enumerated valid filter values.
///
/// Industries, segments, use cases and CRM types are fixed; companies come from the
/// loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTables {
    pub industries: Vec<String>,
    pub market_segments: Vec<String>,
    pub use_cases: Vec<String>,
    pub crm_types: Vec<String>,
    pub companies: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl EntityTables {
    pub fn standard(companies: Vec<String>) -> Self {
        Self {
            industries: owned(INDUSTRIES),
            market_segments: owned(MARKET_SEGMENTS),
            use_cases: owned(USE_CASES),
            crm_types: owned(CRM_TYPES),
            companies,
        }
    }

    pub fn from_store(store: &ReferenceStore) -> Self {
        Self::standard(store.company_names())
    }

    pub fn values(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Industry => &self.industries,
            EntityKind::MarketSegment => &self.market_segments,
            EntityKind::UseCase => &self.use_cases,
            EntityKind::CrmType => &self.crm_types,
            EntityKind::Company => &self.companies,
        }
    }

    /// Maps a candidate value onto its enumerated spelling.
    ///
    /// Exact match first, then case-insensitive; anything else is rejected.
    pub fn resolve(&self, kind: EntityKind, candidate: &str) -> Option<String> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }

        let values = self.values(kind);
        values
            .iter()
            .find(|v| v.as_str() == candidate)
            .or_else(|| {
                let lower = candidate.to_lowercase();
                values.iter().find(|v| v.to_lowercase() == lower)
            })
            .cloned()
    }

    /// Canonicalizes user-supplied filter values.
    ///
    /// Known values take their enumerated spelling. Unknown values are kept as given;
    /// they narrow the candidate set to nothing rather than being silently dropped.
    /// Company stays untouched because it is a substring match.
    pub fn canonicalize(&self, filter: &ReferenceFilter) -> ReferenceFilter {
        let field = |kind: EntityKind, value: Option<&str>| -> Option<String> {
            let value = value?;
            match self.resolve(kind, value) {
                Some(known) => Some(known),
                None => {
                    warn!(field = kind.as_str(), value, "Filter value is not an enumerated value");
                    Some(value.to_string())
                }
            }
        };

        ReferenceFilter {
            industry: field(EntityKind::Industry, filter.industry()),
            market_segment: field(EntityKind::MarketSegment, filter.market_segment()),
            use_case: field(EntityKind::UseCase, filter.use_case()),
            crm_type: field(EntityKind::CrmType, filter.crm_type()),
            company: filter.company().map(str::to_string),
        }
    }
}
