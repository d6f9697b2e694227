//! Read-only customer reference dataset.
//!
//! The store is loaded and validated once at startup, then shared behind an `Arc`.
//! Nothing mutates it afterwards, so concurrent searches read it without locking.
//!
//! # Visibility
//!
//! Only records with `approvedForPublicUse = true` are ever handed to the pipeline:
//! [`ReferenceStore::approved`] and [`ReferenceStore::filter_candidates`] are the only
//! accessors used by the search path.

pub mod error;
pub mod types;


pub use error::StoreError;
pub use types::{CustomerReference, ReferenceFilter};

use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Sample dataset compiled into the binary, used when no dataset path is configured.
const BUNDLED_DATASET: &str = include_str!("../../data/references.json");

#[derive(Debug, Clone)]
pub struct ReferenceStore {
    references: Vec<CustomerReference>,
}

impl ReferenceStore {
    /// Validates and wraps a set of records.
    pub fn new(references: Vec<CustomerReference>) -> Result<Self, StoreError> {
        if references.is_empty() {
            return Err(StoreError::Empty);
        }

        for (index, reference) in references.iter().enumerate() {
            if reference.reference_detail.trim().is_empty() {
                return Err(StoreError::EmptyQuote {
                    index,
                    customer: reference.customer_name.clone(),
                });
            }
        }

        Ok(Self { references })
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let references: Vec<CustomerReference> = serde_json::from_str(json)?;
        Self::new(references)
    }

    /// Loads a JSON array of references from disk.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&raw)?;

        info!(
            path = %path.display(),
            total = store.len(),
            approved = store.approved_count(),
            "Loaded reference dataset"
        );

        Ok(store)
    }

    pub fn bundled() -> Result<Self, StoreError> {
        let store = Self::from_json_str(BUNDLED_DATASET)?;
        info!(
            total = store.len(),
            approved = store.approved_count(),
            "Loaded bundled sample reference dataset"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Records cleared for outward-facing use.
    pub fn approved(&self) -> impl Iterator<Item = &CustomerReference> {
        self.references.iter().filter(|r| r.approved_for_public_use)
    }

    pub fn approved_count(&self) -> usize {
        self.approved().count()
    }

    /// Distinct customer names among approved records, sorted.
    pub fn company_names(&self) -> Vec<String> {
        self.approved()
            .map(|r| r.customer_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Applies structured filters to the approved records.
    ///
    /// Order: industry, market segment, use case, CRM type (case-insensitive equality),
    /// then company (case-insensitive substring of customer or account name). An empty
    /// result is a valid outcome.
    pub fn filter_candidates(&self, filter: &ReferenceFilter) -> Vec<CustomerReference> {
        let mut candidates: Vec<&CustomerReference> = self.approved().collect();
        debug!(count = candidates.len(), "Approved references before filtering");

        if let Some(industry) = filter.industry() {
            candidates.retain(|r| r.industry.eq_ignore_ascii_case(industry));
            debug!(industry, count = candidates.len(), "After industry filter");
        }

        if let Some(segment) = filter.market_segment() {
            candidates.retain(|r| r.market_segment.eq_ignore_ascii_case(segment));
            debug!(segment, count = candidates.len(), "After market segment filter");
        }

        if let Some(use_case) = filter.use_case() {
            candidates.retain(|r| r.use_case.eq_ignore_ascii_case(use_case));
            debug!(use_case, count = candidates.len(), "After use case filter");
        }

        if let Some(crm) = filter.crm_type() {
            candidates.retain(|r| r.crm.eq_ignore_ascii_case(crm));
            debug!(crm, count = candidates.len(), "After CRM filter");
        }

        if let Some(company) = filter.company() {
            let needle = company.to_lowercase();
            candidates.retain(|r| {
                r.customer_name.to_lowercase().contains(&needle)
                    || r.account_name.to_lowercase().contains(&needle)
            });
            debug!(company, count = candidates.len(), "After company filter");
        }

        candidates.into_iter().cloned().collect()
    }
}
