//! Result processor contract

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::search::Hit;
use crate::domain::DomainError;

/// Entity type that receives the product sub-protocol
pub const PRODUCT_ENTITY: &str = "product";

/// Per-request inputs available to a processor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessContext {
    /// Resolved customer group, only provided for product searches
    pub group_id: Option<String>,
    pub index: String,
}

impl ProcessContext {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            group_id: None,
            index: index.into(),
        }
    }

    pub fn with_group_id(mut self, group_id: Option<String>) -> Self {
        self.group_id = group_id;
        self
    }
}

/// Transforms the ordered hit list of a search result
#[async_trait]
pub trait ResultProcessor: Send + Sync + Debug {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn process(&self, hits: Vec<Hit>, context: &ProcessContext) -> Result<Vec<Hit>, DomainError>;
}

/// Returns hits unchanged
#[derive(Debug, Clone, Default)]
pub struct PassthroughProcessor;

#[async_trait]
impl ResultProcessor for PassthroughProcessor {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn process(&self, hits: Vec<Hit>, _context: &ProcessContext) -> Result<Vec<Hit>, DomainError> {
        Ok(hits)
    }
}
