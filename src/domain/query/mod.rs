//! Query domain - Translation from search-query documents to backend query DSL

use std::fmt::Debug;

use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Translates a higher-level search query into the backend's native body
pub trait QueryBuilder: Send + Sync + Debug {
    fn build(&self, search_query: &Map<String, Value>) -> Result<Map<String, Value>, DomainError>;
}
