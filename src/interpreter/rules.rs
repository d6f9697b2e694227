//! Conservative rule-based filter inference.
//!
//! Used whenever assisted interpretation is unavailable. Only values named explicitly
//! in the text are inferred:
//! - industry: the name within a short distance of the word "industry" or "sector"
//! - market segment: whole-word match on the name or its abbreviation expansion
//!   ("Small Medium Business" infers `SMB`)
//! - company: whole-word match tolerating `.`, `,` and `&` variations
//!
//! The first match per category, in table order, wins.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::catalog::{ABBREVIATIONS, EntityTables};
use crate::constants::INDUSTRY_PROXIMITY_CHARS;
use crate::store::ReferenceFilter;

struct Rule {
    value: String,
    pattern: Regex,
}

#[derive(Default)]
pub struct InferenceRules {
    industries: Vec<Rule>,
    segments: Vec<Rule>,
    companies: Vec<Rule>,
}

impl std::fmt::Debug for InferenceRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceRules")
            .field("industries", &self.industries.len())
            .field("segments", &self.segments.len())
            .field("companies", &self.companies.len())
            .finish()
    }
}

fn compile(values: &[String], source: impl Fn(&str) -> String) -> Vec<Rule> {
    values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .filter_map(|value| {
            match RegexBuilder::new(&source(value)).case_insensitive(true).build() {
                Ok(pattern) => Some(Rule {
                    value: value.clone(),
                    pattern,
                }),
                Err(e) => {
                    warn!(value = %value, error = %e, "Skipping unbuildable inference rule");
                    None
                }
            }
        })
        .collect()
}

fn industry_source(industry: &str) -> String {
    let name = regex::escape(industry);
    let gap = INDUSTRY_PROXIMITY_CHARS;
    format!(
        r"\b{name}\b.{{0,{gap}}}\b(?:industry|sector)\b|\b(?:industry|sector)\b.{{0,{gap}}}\b{name}\b"
    )
}

/// Descriptions are expanded before inference, so a segment that is itself an
/// abbreviation must also match what it expands to.
fn segment_source(segment: &str) -> String {
    let alternatives = std::iter::once(segment)
        .chain(
            ABBREVIATIONS
                .iter()
                .filter(|(abbr, _)| abbr.eq_ignore_ascii_case(segment))
                .map(|(_, expansion)| *expansion),
        )
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?:{alternatives})")
}

/// "Summit Parts Co." also matches "summit parts co" and "Summit Parts Co,".
fn company_source(company: &str) -> String {
    let body = company
        .split(['.', ',', '&'])
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[ .,&]?");
    format!(r"\b{body}\b")
}

fn first_match<'a>(rules: &'a [Rule], text: &str) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.value.as_str())
}

impl InferenceRules {
    pub fn new(tables: &EntityTables) -> Self {
        Self {
            industries: compile(&tables.industries, industry_source),
            segments: compile(&tables.market_segments, segment_source),
            companies: compile(&tables.companies, company_source),
        }
    }

    /// Infers industry, market segment and company for fields `existing` leaves unset.
    pub fn infer(&self, text: &str, existing: &ReferenceFilter) -> ReferenceFilter {
        let mut inferred = ReferenceFilter::default();

        if existing.industry().is_none() {
            inferred.industry = first_match(&self.industries, text).map(str::to_string);
        }
        if existing.market_segment().is_none() {
            inferred.market_segment = first_match(&self.segments, text).map(str::to_string);
        }
        if existing.company().is_none() {
            inferred.company = first_match(&self.companies, text).map(str::to_string);
        }

        inferred
    }
}
