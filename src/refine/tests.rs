use super::*;
use crate::provider::{ProviderKind, ScriptedProvider};
use crate::store::CustomerReference;

const QUOTE: &str = "We have seen 45-60% email engagement rates and saved $10,000 per year.";

fn result(name: &str, detail: &str, confidence: u8) -> ReferenceResult {
    ReferenceResult::new(
        CustomerReference {
            customer_name: name.to_string(),
            account_name: String::new(),
            reference_type: "Quote".to_string(),
            approved_for_public_use: true,
            use_case: "Engagement".to_string(),
            capability: "Email Marketing".to_string(),
            case_study_link: String::new(),
            crm: "Salesforce".to_string(),
            customer_contact: String::new(),
            reference_detail: detail.to_string(),
            reference_slide_link: String::new(),
            industry: "Healthcare Services".to_string(),
            market_segment: "Enterprise".to_string(),
            verified: "Yes".to_string(),
        },
        confidence,
    )
}

fn ranked() -> Vec<ReferenceResult> {
    vec![
        result("First", QUOTE, 80),
        result("Second", "Support answers within the hour.", 70),
        result("Third", "Onboarding took three weeks.", 60),
    ]
}

fn texts(result: &ReferenceResult) -> Vec<&str> {
    result
        .highlights
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|h| h.text.as_str())
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_verified_highlights_reject_near_misses() {
    let candidates = strings(&[
        "45-60 %",
        "Email engagement",
        "engagement rates.",
        "45\u{2013}60%",
        "$10,000 per year ",
        "   ",
        "",
        "45-60%",
        "45-60%",
        "$10,000",
    ]);

    let kept = verified_highlights(QUOTE, &candidates);

    let kept_texts: Vec<&str> = kept.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(kept_texts, vec!["45-60%", "$10,000"]);
    assert!(kept.iter().all(|h| h.relevance == "high"));
    assert!(kept.iter().all(|h| QUOTE.contains(&h.text)));
}

#[test]
fn test_verified_highlights_capped_at_three() {
    let candidates = strings(&["We", "have", "seen", "45-60%"]);
    assert_eq!(verified_highlights(QUOTE, &candidates).len(), 3);
}

#[test]
fn test_apply_refinements_rescores_and_sorts() {
    let refinements = vec![
        Refinement {
            id: 2,
            revised_confidence: Some(95.0),
            highlights: Some(strings(&["three weeks"])),
        },
        Refinement {
            id: 0,
            revised_confidence: Some(0.0),
            highlights: Some(strings(&["45-60%", "made up phrase"])),
        },
    ];

    let refined = apply_refinements(ranked(), &refinements, 5);

    assert_eq!(
        refined.iter().map(|r| r.customer_name()).collect::<Vec<_>>(),
        vec!["Third", "First", "Second"]
    );
    assert_eq!(refined[0].confidence, 95);
    assert_eq!(texts(&refined[0]), vec!["three weeks"]);
    // Zero revised confidence keeps the original score.
    assert_eq!(refined[1].confidence, 80);
    assert_eq!(texts(&refined[1]), vec!["45-60%"]);
    // No refinement: untouched.
    assert_eq!(refined[2].confidence, 70);
    assert!(refined[2].highlights.is_none());
}

#[test]
fn test_apply_refinements_ignores_unknown_ids_and_truncates() {
    let refinements = vec![
        Refinement {
            id: -1,
            revised_confidence: Some(99.0),
            highlights: None,
        },
        Refinement {
            id: 42,
            revised_confidence: Some(99.0),
            highlights: None,
        },
        Refinement {
            id: 1,
            revised_confidence: Some(250.0),
            highlights: Some(strings(&["not in the quote"])),
        },
    ];

    let refined = apply_refinements(ranked(), &refinements, 2);

    assert_eq!(refined.len(), 2);
    assert_eq!(refined[0].customer_name(), "Second");
    assert_eq!(refined[0].confidence, 100);
    assert!(refined[0].highlights.is_none());
    assert_eq!(refined[1].customer_name(), "First");
}

#[tokio::test]
async fn test_refine_uses_original_request() {
    let provider = ScriptedProvider::replying(
        ProviderKind::Anthropic,
        r#"[{"id": 1, "revisedConfidence": 90, "highlights": ["within the hour"]}]"#,
    );

    let outcome = refine(&provider, "fast support, SMB", ranked(), 5).await;

    assert!(outcome.refined);
    assert_eq!(outcome.results[0].customer_name(), "Second");
    assert_eq!(texts(&outcome.results[0]), vec!["within the hour"]);

    let request = &provider.requests()[0];
    assert_eq!(request.stage, CompletionStage::Refine);
    assert!(request.prompt.contains("\"fast support, SMB\""));
    assert!(request.prompt.contains("\"currentConfidence\": 70"));
}

#[tokio::test]
async fn test_refine_failure_returns_truncated_input() {
    let provider = ScriptedProvider::failing(ProviderKind::Anthropic);
    let outcome = refine(&provider, "anything", ranked(), 2).await;

    assert!(!outcome.refined);
    assert_eq!(
        outcome.results.iter().map(|r| r.customer_name()).collect::<Vec<_>>(),
        vec!["First", "Second"]
    );

    let garbled = ScriptedProvider::replying(ProviderKind::Anthropic, "{\"not\": \"an array\"}");
    let outcome = refine(&garbled, "anything", ranked(), 5).await;
    assert!(!outcome.refined);
    assert_eq!(outcome.results, ranked());
}

#[tokio::test]
async fn test_refine_empty_input_skips_provider() {
    let provider = ScriptedProvider::failing(ProviderKind::Anthropic);
    let outcome = refine(&provider, "anything", Vec::new(), 5).await;

    assert!(outcome.results.is_empty());
    assert_eq!(provider.total_calls(), 0);
}
