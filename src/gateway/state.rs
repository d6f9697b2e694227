use std::sync::Arc;

use crate::search::SearchService;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

impl AppState {
    pub fn new(service: SearchService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
