//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::ResultCache;
use crate::infrastructure::services::SearchService;

/// Shared handler state
#[derive(Clone, Debug)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
    /// Same store the search service writes through
    pub cache: Arc<dyn ResultCache>,
    /// Token guarding the cache administration endpoints
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(search_service: Arc<SearchService>, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            search_service,
            cache,
            admin_token: None,
        }
    }

    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_token = token.filter(|t| !t.is_empty()).map(Arc::from);
        self
    }
}
