use serde::{Deserialize, Serialize};

/// A customer quote/testimonial record.
///
/// Field names follow the camelCase shape of the exported CRM report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReference {
    pub customer_name: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub reference_type: String,
    pub approved_for_public_use: bool,
    #[serde(default)]
    pub use_case: String,
    #[serde(default)]
    pub capability: String,
    #[serde(default)]
    pub case_study_link: String,
    #[serde(default)]
    pub crm: String,
    #[serde(default)]
    pub customer_contact: String,
    /// The quote text. Never empty once loaded into a [`ReferenceStore`](super::ReferenceStore).
    pub reference_detail: String,
    #[serde(default)]
    pub reference_slide_link: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub market_segment: String,
    #[serde(default)]
    pub verified: String,
}

/// Structured narrowing applied before ranking.
///
/// Blank and whitespace-only values behave exactly like `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceFilter {
    pub industry: Option<String>,
    pub market_segment: Option<String>,
    pub use_case: Option<String>,
    pub crm_type: Option<String>,
    /// Substring match against customer or account name.
    pub company: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ReferenceFilter {
    pub fn industry(&self) -> Option<&str> {
        active(&self.industry)
    }

    pub fn market_segment(&self) -> Option<&str> {
        active(&self.market_segment)
    }

    pub fn use_case(&self) -> Option<&str> {
        active(&self.use_case)
    }

    pub fn crm_type(&self) -> Option<&str> {
        active(&self.crm_type)
    }

    pub fn company(&self) -> Option<&str> {
        active(&self.company)
    }

    /// Returns `true` when no field would narrow the candidate set.
    pub fn is_empty(&self) -> bool {
        self.industry().is_none()
            && self.market_segment().is_none()
            && self.use_case().is_none()
            && self.crm_type().is_none()
            && self.company().is_none()
    }

    /// Fills fields unset here with values from `inferred`. Values already set win.
    pub fn merged_with(&self, inferred: &ReferenceFilter) -> ReferenceFilter {
        fn pick(own: Option<&str>, other: Option<&str>) -> Option<String> {
            own.or(other).map(str::to_string)
        }

        ReferenceFilter {
            industry: pick(self.industry(), inferred.industry()),
            market_segment: pick(self.market_segment(), inferred.market_segment()),
            use_case: pick(self.use_case(), inferred.use_case()),
            crm_type: pick(self.crm_type(), inferred.crm_type()),
            company: pick(self.company(), inferred.company()),
        }
    }

    pub fn with_industry(mut self, value: impl Into<String>) -> Self {
        self.industry = Some(value.into());
        self
    }

    pub fn with_market_segment(mut self, value: impl Into<String>) -> Self {
        self.market_segment = Some(value.into());
        self
    }

    pub fn with_use_case(mut self, value: impl Into<String>) -> Self {
        self.use_case = Some(value.into());
        self
    }

    pub fn with_crm_type(mut self, value: impl Into<String>) -> Self {
        self.crm_type = Some(value.into());
        self
    }

    pub fn with_company(mut self, value: impl Into<String>) -> Self {
        self.company = Some(value.into());
        self
    }
}
