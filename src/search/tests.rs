use super::*;
use crate::provider::{CompletionProvider, CompletionStage, ScriptedProvider};
use crate::store::ReferenceFilter;

fn registry(providers: &[Arc<ScriptedProvider>]) -> ProviderRegistry {
    ProviderRegistry::new(
        providers
            .iter()
            .map(|p| p.clone() as Arc<dyn CompletionProvider>)
            .collect(),
    )
}

fn service(providers: &[Arc<ScriptedProvider>]) -> SearchService {
    let store = ReferenceStore::bundled().expect("bundled dataset");
    SearchService::new(Arc::new(store), registry(providers), SearchSettings::default())
}

fn insurance_request() -> ReferenceRequest {
    ReferenceRequest::new("customer who saved money on licensing")
        .with_filters(ReferenceFilter::default().with_industry("Insurance"))
        .with_provider(ProviderKind::Anthropic)
}

#[tokio::test]
async fn test_empty_description_rejected_before_any_call() {
    let provider = Arc::new(ScriptedProvider::failing(ProviderKind::Anthropic));
    let svc = service(&[provider.clone()]);

    let result = svc.search(&ReferenceRequest::new("   ")).await;

    assert!(matches!(result, Err(SearchError::EmptyDescription)));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn test_demo_mode_allows_empty_description_and_skips_providers() {
    let provider = Arc::new(ScriptedProvider::failing(ProviderKind::Anthropic));
    let svc = service(&[provider.clone()]);

    let outcome = svc
        .search(&ReferenceRequest::new("").with_demo_mode(true))
        .await
        .expect("demo never fails");

    assert_eq!(outcome.ranking, RankingSource::Demo);
    assert_eq!(outcome.results.len(), 5);
    assert!(outcome.results.iter().all(|r| r.is_approved()));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn test_demo_mode_with_unmatched_filter_samples_approved() {
    let svc = service(&[]);
    let request = ReferenceRequest::new("anything")
        .with_demo_mode(true)
        .with_filters(ReferenceFilter::default().with_industry("Healthcare Software"));

    let outcome = svc.search(&request).await.expect("demo never fails");

    let approved = svc.store().approved_count();
    assert_eq!(outcome.results.len(), approved.min(5));
    assert!(outcome.results.iter().all(|r| r.is_approved()));
    assert!(outcome.results.iter().all(|r| (65..=99).contains(&r.confidence)));
}

#[tokio::test]
async fn test_demo_mode_with_matching_filter_uses_candidates() {
    let svc = service(&[]);
    let request = ReferenceRequest::new("anything")
        .with_demo_mode(true)
        .with_filters(ReferenceFilter::default().with_market_segment("Enterprise"));

    let outcome = svc.search(&request).await.expect("demo never fails");

    assert!(!outcome.results.is_empty());
    assert!(outcome.results.iter().all(|r| r.reference.market_segment == "Enterprise"));
    assert!(outcome.results.iter().all(|r| (80..=95).contains(&r.confidence)));
}

#[tokio::test]
async fn test_no_candidates_returns_empty_without_ranking() {
    let provider = Arc::new(ScriptedProvider::failing(ProviderKind::Anthropic));
    let svc = service(&[provider.clone()]);
    let request = ReferenceRequest::new("mining onboarding").with_filters(
        ReferenceFilter::default()
            .with_industry("Mining")
            .with_market_segment("Enterprise"),
    );

    let outcome = svc.search(&request).await.expect("search");

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.ranking, RankingSource::None);
    assert_eq!(provider.calls(CompletionStage::Rank), 0);
}

#[tokio::test]
async fn test_falls_back_to_next_provider_once() {
    let primary = Arc::new(ScriptedProvider::failing(ProviderKind::Anthropic));
    let secondary = Arc::new(ScriptedProvider::per_stage(
        ProviderKind::OpenAi,
        None,
        Some(r#"[{"id": 0, "confidence": 77}]"#),
        None,
    ));
    let svc = service(&[primary.clone(), secondary.clone()]);

    let outcome = svc.search(&insurance_request()).await.expect("search");

    assert_eq!(outcome.ranking, RankingSource::Provider(ProviderKind::OpenAi));
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].customer_name(), "Harbor Insurance Group");
    assert_eq!(outcome.results[0].confidence, 77);
    assert_eq!(primary.calls(CompletionStage::Rank), 1);
    assert_eq!(secondary.calls(CompletionStage::Rank), 1);
    // Refinement goes to the ranking provider, whose refine reply fails; ranking is kept.
    assert!(!outcome.refined);
    assert_eq!(primary.calls(CompletionStage::Refine), 0);
    assert_eq!(secondary.calls(CompletionStage::Refine), 1);
}

#[tokio::test]
async fn test_requested_provider_is_tried_first() {
    let anthropic = Arc::new(ScriptedProvider::per_stage(
        ProviderKind::Anthropic,
        None,
        Some(r#"[{"id": 0, "confidence": 50}]"#),
        None,
    ));
    let gemini = Arc::new(ScriptedProvider::per_stage(
        ProviderKind::Gemini,
        None,
        Some(r#"[{"id": 0, "confidence": 66}]"#),
        None,
    ));
    let svc = service(&[anthropic.clone(), gemini.clone()]);

    let request = insurance_request().with_provider(ProviderKind::Gemini);
    let outcome = svc.search(&request).await.expect("search");

    assert_eq!(outcome.ranking, RankingSource::Provider(ProviderKind::Gemini));
    assert_eq!(anthropic.calls(CompletionStage::Rank), 0);
    assert_eq!(gemini.calls(CompletionStage::Interpret), 1);
}

#[tokio::test]
async fn test_all_providers_fail_uses_keyword_fallback() {
    let a = Arc::new(ScriptedProvider::failing(ProviderKind::Anthropic));
    let b = Arc::new(ScriptedProvider::replying(ProviderKind::OpenAi, "not json"));
    let svc = service(&[a.clone(), b.clone()]);

    let results = svc
        .find_references(&insurance_request())
        .await
        .expect("fallback never fails");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].customer_name(), "Harbor Insurance Group");
    assert!(results[0].confidence >= 60);
    assert_eq!(a.calls(CompletionStage::Rank), 1);
    assert_eq!(b.calls(CompletionStage::Rank), 1);
}

#[tokio::test]
async fn test_keyword_fallback_does_not_retry_providers_for_refinement() {
    let provider = Arc::new(ScriptedProvider::per_stage(
        ProviderKind::Anthropic,
        None,
        None,
        Some(r#"[{"id": 0, "revisedConfidence": 99}]"#),
    ));
    let svc = service(&[provider.clone()]);

    let outcome = svc.search(&insurance_request()).await.expect("search");

    assert_eq!(outcome.ranking, RankingSource::Keyword);
    assert!(!outcome.refined);
    assert_eq!(provider.calls(CompletionStage::Refine), 0);
}

#[tokio::test]
async fn test_without_providers_uses_keywords_and_skips_refinement() {
    let svc = service(&[]);
    let outcome = svc.search(&insurance_request()).await.expect("search");

    assert_eq!(outcome.ranking, RankingSource::Keyword);
    assert!(!outcome.refined);
    assert_eq!(outcome.interpretation, InterpretationSource::RuleBased);
}

#[tokio::test]
async fn test_refinement_applies_highlights() {
    let provider = Arc::new(ScriptedProvider::per_stage(
        ProviderKind::Anthropic,
        Some(r#"{"improvedDescription": "Insurance customer that saved on licensing", "optimizedQuery": "saved licensing"}"#),
        Some(r#"[{"id": 0, "confidence": 70}]"#),
        Some(r#"[{"id": 0, "revisedConfidence": 91, "highlights": ["saved $10,000 in annual licensing", "not a real phrase"]}]"#),
    ));
    let svc = service(&[provider.clone()]);

    let outcome = svc.search(&insurance_request()).await.expect("search");

    assert!(outcome.refined);
    assert_eq!(
        outcome.interpretation,
        InterpretationSource::Assisted(ProviderKind::Anthropic)
    );
    let top = &outcome.results[0];
    assert_eq!(top.confidence, 91);
    let highlights = top.highlights.as_ref().expect("highlights");
    assert_eq!(highlights.len(), 1);
    assert!(top.reference.reference_detail.contains(&highlights[0].text));

    let requests = provider.requests();
    let rank_prompt = &requests
        .iter()
        .find(|r| r.stage == CompletionStage::Rank)
        .expect("rank request")
        .prompt;
    let refine_prompt = &requests
        .iter()
        .find(|r| r.stage == CompletionStage::Refine)
        .expect("refine request")
        .prompt;
    assert!(rank_prompt.contains("\"saved licensing\""));
    assert!(refine_prompt.contains("\"customer who saved money on licensing\""));
}
