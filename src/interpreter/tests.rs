use super::prompt::{InferredValue, validate_filter_value};
use super::*;
use crate::catalog::EntityKind;
use crate::provider::{ProviderKind, ScriptedProvider};

fn tables() -> Arc<EntityTables> {
    Arc::new(EntityTables::standard(vec![
        "Acme".to_string(),
        "Northwind Health Partners".to_string(),
        "Summit Parts Co.".to_string(),
    ]))
}

fn interpreter() -> QueryInterpreter {
    QueryInterpreter::new(tables())
}

#[test]
fn test_rules_infer_industry_near_keyword() {
    let enhanced = interpreter().interpret_offline(&ReferenceRequest::new(
        "customer in the healthcare services industry with strong engagement",
    ));

    assert_eq!(enhanced.filters.industry(), Some("Healthcare Services"));
    assert_eq!(enhanced.source, InterpretationSource::RuleBased);
}

#[test]
fn test_rules_infer_industry_after_keyword() {
    let enhanced =
        interpreter().interpret_offline(&ReferenceRequest::new("a quote from the sector of insurance"));
    assert_eq!(enhanced.filters.industry(), Some("Insurance"));
}

#[test]
fn test_rules_require_industry_keyword() {
    let enhanced =
        interpreter().interpret_offline(&ReferenceRequest::new("healthcare services customer"));
    assert_eq!(enhanced.filters.industry(), None);
}

#[test]
fn test_rules_reject_distant_industry_keyword() {
    let enhanced = interpreter().interpret_offline(&ReferenceRequest::new(
        "mining customers who love our onboarding process, any industry",
    ));
    assert_eq!(enhanced.filters.industry(), None);
}

#[test]
fn test_rules_infer_segment_after_expansion() {
    let enhanced = interpreter().interpret_offline(&ReferenceRequest::new("ENT customer on SF"));

    assert_eq!(enhanced.filters.market_segment(), Some("Enterprise"));
    assert_eq!(enhanced.optimized_query, "Enterprise customer on Salesforce");
    assert_eq!(enhanced.description, enhanced.optimized_query);
}

#[test]
fn test_rules_infer_abbreviated_segment() {
    for text in ["SMB customer using HubSpot", "a small medium business on Sugar"] {
        let enhanced = interpreter().interpret_offline(&ReferenceRequest::new(text));
        assert_eq!(enhanced.filters.market_segment(), Some("SMB"), "text: {text}");
    }
}

#[test]
fn test_rules_infer_company_with_punctuation_variants() {
    let interp = interpreter();

    let plain = interp.interpret_offline(&ReferenceRequest::new("something like summit parts co did"));
    assert_eq!(plain.filters.company(), Some("Summit Parts Co."));

    let whole_word = interp.interpret_offline(&ReferenceRequest::new("acmesoft style results"));
    assert_eq!(whole_word.filters.company(), None);
}

#[test]
fn test_user_filters_win_over_inferred() {
    let request = ReferenceRequest::new("mining industry example for Mid Market").with_filters(
        ReferenceFilter::default()
            .with_industry("insurance")
            .with_use_case("Nurture"),
    );

    let enhanced = interpreter().interpret_offline(&request);

    assert_eq!(enhanced.filters.industry(), Some("Insurance"));
    assert_eq!(enhanced.filters.market_segment(), Some("Mid Market"));
    assert_eq!(enhanced.filters.use_case(), Some("Nurture"));
    assert_eq!(enhanced.original, request);
}

#[test]
fn test_validate_filter_value() {
    let tables = tables();

    let exact = InferredValue::One("Insurance".to_string());
    assert_eq!(
        validate_filter_value(&tables, EntityKind::Industry, Some(&exact)).as_deref(),
        Some("Insurance")
    );

    let list = InferredValue::Many(vec!["smb".to_string(), "Enterprise".to_string()]);
    assert_eq!(
        validate_filter_value(&tables, EntityKind::MarketSegment, Some(&list)).as_deref(),
        Some("SMB")
    );

    let empty = InferredValue::Many(vec![]);
    assert_eq!(validate_filter_value(&tables, EntityKind::MarketSegment, Some(&empty)), None);

    let unknown = InferredValue::One("Healthcare".to_string());
    assert_eq!(validate_filter_value(&tables, EntityKind::Industry, Some(&unknown)), None);
    assert_eq!(validate_filter_value(&tables, EntityKind::Company, None), None);
}

#[tokio::test]
async fn test_assisted_interpretation_validates_inferred_values() {
    let provider = ScriptedProvider::replying(
        ProviderKind::Anthropic,
        r#"```json
{
  "improvedDescription": "Healthcare services customer using Salesforce",
  "optimizedQuery": "healthcare Salesforce email engagement",
  "inferredFilters": {
    "industry": "healthcare services",
    "marketSegment": "Huge",
    "company": ["acme", "Northwind Health Partners"]
  }
}
```"#,
    );

    let enhanced = interpreter()
        .interpret(&ReferenceRequest::new("healthcare SF customer"), Some(&provider))
        .await;

    assert_eq!(enhanced.source, InterpretationSource::Assisted(ProviderKind::Anthropic));
    assert_eq!(enhanced.optimized_query, "healthcare Salesforce email engagement");
    assert_eq!(enhanced.filters.industry(), Some("Healthcare Services"));
    assert_eq!(enhanced.filters.market_segment(), None);
    assert_eq!(enhanced.filters.company(), Some("Acme"));
    assert_eq!(provider.calls(CompletionStage::Interpret), 1);
}

#[tokio::test]
async fn test_assisted_prompt_uses_expanded_description() {
    let provider = ScriptedProvider::replying(
        ProviderKind::OpenAi,
        r#"{"improvedDescription": "x", "inferredFilters": {}}"#,
    );

    interpreter()
        .interpret(&ReferenceRequest::new("SMB on HS"), Some(&provider))
        .await;

    let prompt = &provider.requests()[0].prompt;
    assert!(prompt.contains("Small Medium Business on HubSpot"));
    assert!(prompt.contains("Healthcare Services"));
    assert!(prompt.contains("Summit Parts Co."));
}

#[tokio::test]
async fn test_assisted_blank_fields_fall_back() {
    let provider = ScriptedProvider::replying(
        ProviderKind::Gemini,
        r#"{"improvedDescription": "Clarified text", "optimizedQuery": "  "}"#,
    );
    let enhanced = interpreter()
        .interpret(&ReferenceRequest::new("raw text"), Some(&provider))
        .await;
    assert_eq!(enhanced.description, "Clarified text");
    assert_eq!(enhanced.optimized_query, "Clarified text");

    let provider = ScriptedProvider::replying(
        ProviderKind::Gemini,
        r#"{"improvedDescription": "", "optimizedQuery": ""}"#,
    );
    let enhanced = interpreter()
        .interpret(&ReferenceRequest::new("ROI story"), Some(&provider))
        .await;
    assert_eq!(enhanced.description, "return on investment story");
    assert_eq!(enhanced.optimized_query, "return on investment story");
}

#[tokio::test]
async fn test_provider_failure_falls_back_to_rules() {
    let provider = ScriptedProvider::failing(ProviderKind::Anthropic);

    let enhanced = interpreter()
        .interpret(&ReferenceRequest::new("ENT customer"), Some(&provider))
        .await;

    assert_eq!(enhanced.source, InterpretationSource::RuleBased);
    assert_eq!(enhanced.optimized_query, "Enterprise customer");
    assert_eq!(enhanced.filters.market_segment(), Some("Enterprise"));
}

#[tokio::test]
async fn test_unparseable_reply_falls_back_to_rules() {
    for reply in [
        "Sorry, I can't help with that.",
        r#"{"optimizedQuery": "missing description"}"#,
        r#"{"improvedDescription": "x", "inferredFilters": {"industry": 42}}"#,
    ] {
        let provider = ScriptedProvider::replying(ProviderKind::Anthropic, reply);
        let enhanced = interpreter()
            .interpret(&ReferenceRequest::new("a query"), Some(&provider))
            .await;
        assert_eq!(enhanced.source, InterpretationSource::RuleBased, "reply: {reply}");
        assert_eq!(enhanced.optimized_query, "a query");
    }
}

#[tokio::test]
async fn test_no_provider_uses_rules() {
    let enhanced = interpreter()
        .interpret(&ReferenceRequest::new("MM retail"), None)
        .await;
    assert_eq!(enhanced.source, InterpretationSource::RuleBased);
    assert_eq!(enhanced.filters.market_segment(), Some("Mid Market"));
}
