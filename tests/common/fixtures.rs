//! Reference and service builders.

use std::sync::Arc;

use refsearch::provider::{CompletionProvider, ProviderRegistry, ScriptedProvider};
use refsearch::search::{SearchService, SearchSettings};
use refsearch::store::{CustomerReference, ReferenceStore};

/// Builds a [`CustomerReference`] with sensible defaults.
pub struct ReferenceBuilder {
    reference: CustomerReference,
}

impl ReferenceBuilder {
    pub fn new(customer_name: &str) -> Self {
        Self {
            reference: CustomerReference {
                customer_name: customer_name.to_string(),
                account_name: format!("{customer_name} Inc"),
                reference_type: "Quote".to_string(),
                approved_for_public_use: true,
                use_case: "Engagement".to_string(),
                capability: "Email Marketing".to_string(),
                case_study_link: String::new(),
                crm: "Other".to_string(),
                customer_contact: String::new(),
                reference_detail: format!("{customer_name} grew engagement with the platform."),
                reference_slide_link: String::new(),
                industry: "Other Software".to_string(),
                market_segment: "SMB".to_string(),
                verified: "Yes".to_string(),
            },
        }
    }

    pub fn industry(mut self, industry: &str) -> Self {
        self.reference.industry = industry.to_string();
        self
    }

    pub fn segment(mut self, segment: &str) -> Self {
        self.reference.market_segment = segment.to_string();
        self
    }

    pub fn crm(mut self, crm: &str) -> Self {
        self.reference.crm = crm.to_string();
        self
    }

    pub fn use_case(mut self, use_case: &str) -> Self {
        self.reference.use_case = use_case.to_string();
        self
    }

    pub fn detail(mut self, detail: &str) -> Self {
        self.reference.reference_detail = detail.to_string();
        self
    }

    pub fn unapproved(mut self) -> Self {
        self.reference.approved_for_public_use = false;
        self
    }

    pub fn build(self) -> CustomerReference {
        self.reference
    }
}

/// One Enterprise/Healthcare/Salesforce reference among unrelated ones.
pub fn healthcare_store() -> ReferenceStore {
    ReferenceStore::new(vec![
        ReferenceBuilder::new("Riverside Clinics")
            .industry("Healthcare Services")
            .segment("Enterprise")
            .crm("Salesforce")
            .detail("Our healthcare outreach runs straight from Salesforce and patient engagement is up 40%.")
            .build(),
        ReferenceBuilder::new("Cobalt Bank")
            .industry("Retail Banking & Credit Unions")
            .segment("Mid Market")
            .crm("Microsoft Dynamics")
            .build(),
        ReferenceBuilder::new("Tiny Clinic")
            .industry("Healthcare Services")
            .segment("SMB")
            .crm("HubSpot")
            .build(),
        ReferenceBuilder::new("Secret Health")
            .industry("Healthcare Services")
            .segment("Enterprise")
            .crm("Salesforce")
            .detail("Healthcare on Salesforce, but we never approved this quote.")
            .unapproved()
            .build(),
    ])
    .expect("valid fixture store")
}

/// Healthcare references exist, but none is approved.
pub fn unapproved_healthcare_store() -> ReferenceStore {
    ReferenceStore::new(vec![
        ReferenceBuilder::new("Hidden Hospital")
            .industry("Healthcare Services")
            .unapproved()
            .build(),
        ReferenceBuilder::new("Alpha Retail").industry("General Consumer Products Retail").build(),
        ReferenceBuilder::new("Beta Realty").industry("Real Estate").build(),
        ReferenceBuilder::new("Gamma Mining").industry("Mining").build(),
    ])
    .expect("valid fixture store")
}

/// Two approved insurance references, ranked positionally as `0` and `1`.
pub fn insurance_store() -> ReferenceStore {
    ReferenceStore::new(vec![
        ReferenceBuilder::new("First Mutual")
            .industry("Insurance")
            .detail("Renewal reminders now go out automatically.")
            .build(),
        ReferenceBuilder::new("Second Assurance")
            .industry("Insurance")
            .detail("Claims follow-ups went from days to minutes.")
            .build(),
        ReferenceBuilder::new("Unrelated Parts").industry("Parts Manufacturing").build(),
    ])
    .expect("valid fixture store")
}

pub fn service(store: ReferenceStore, providers: &[Arc<ScriptedProvider>]) -> SearchService {
    let registry = ProviderRegistry::new(
        providers
            .iter()
            .map(|p| p.clone() as Arc<dyn CompletionProvider>)
            .collect(),
    );
    SearchService::new(Arc::new(store), registry, SearchSettings::default())
}
