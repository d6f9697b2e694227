use serde::Deserialize;

use crate::catalog::{EntityKind, EntityTables};
use crate::store::ReferenceFilter;

fn json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn build_prompt(
    description: &str,
    filters: &ReferenceFilter,
    tables: &EntityTables,
) -> String {
    let current = serde_json::to_string(filters).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"You are an expert interpreter for a customer reference search system used by sales representatives.
I'll provide a query describing the customer reference a rep needs, and I need you to:

1. Improve the query for clarity (fix typos, expand on vague terms)
2. Produce a concise search query optimized for matching against customer quotes
3. ONLY identify industries, market segments or company names that are EXPLICITLY mentioned in the query

Original query: "{description}"

Filters already set by the user (do not change these): {current}

Available filters and valid values:
- industry: {industries}
- marketSegment: {segments}
- company: {companies}

IMPORTANT INSTRUCTIONS:
- Be EXTREMELY conservative with applying filters
- DO NOT infer an industry filter based on a company name
- ONLY apply a filter if the query EXPLICITLY mentions an exact industry name, market segment, or company name
- DO NOT apply any filters for use cases or CRM types

Respond with ONLY a JSON object in this exact format:
{{
  "improvedDescription": "The improved and clarified request",
  "optimizedQuery": "Short query focused on the outcomes and capabilities sought",
  "inferredFilters": {{
    "industry": null,
    "marketSegment": null,
    "company": null
  }}
}}

Replace null with the exact string value from the lists above if a filter should be applied.
Keep as null if no appropriate filter value is found."#,
        industries = json_list(&tables.industries),
        segments = json_list(&tables.market_segments),
        companies = json_list(&tables.companies),
    )
}

/// A model may answer with a single value or, occasionally, a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum InferredValue {
    One(String),
    Many(Vec<String>),
}

impl InferredValue {
    fn first(&self) -> Option<&str> {
        match self {
            InferredValue::One(value) => Some(value),
            InferredValue::Many(values) => values.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InferredFilters {
    #[serde(default)]
    pub industry: Option<InferredValue>,
    #[serde(default)]
    pub market_segment: Option<InferredValue>,
    #[serde(default)]
    pub company: Option<InferredValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InterpretationResponse {
    pub improved_description: String,
    #[serde(default)]
    pub optimized_query: String,
    #[serde(default)]
    pub inferred_filters: InferredFilters,
}

/// Accepts an inferred value only when it resolves to an enumerated one.
pub(crate) fn validate_filter_value(
    tables: &EntityTables,
    kind: EntityKind,
    value: Option<&InferredValue>,
) -> Option<String> {
    tables.resolve(kind, value?.first()?)
}

impl InferredFilters {
    pub(crate) fn validated(&self, tables: &EntityTables) -> ReferenceFilter {
        ReferenceFilter {
            industry: validate_filter_value(tables, EntityKind::Industry, self.industry.as_ref()),
            market_segment: validate_filter_value(
                tables,
                EntityKind::MarketSegment,
                self.market_segment.as_ref(),
            ),
            company: validate_filter_value(tables, EntityKind::Company, self.company.as_ref()),
            ..Default::default()
        }
    }
}
