//! Aggregation to facet-metadata enrichment

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::domain::search::Aggregation;
use crate::domain::DomainError;

use super::aggregation::collect_attribute_options;
use super::service::AttributeService;

#[derive(Debug, Clone)]
pub struct AttributeEnricher {
    service: Arc<dyn AttributeService>,
    timeout: Duration,
}

impl AttributeEnricher {
    pub fn new(service: Arc<dyn AttributeService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Builds facet metadata for the attributes present in `aggregations`.
    ///
    /// Lookup failures and timeouts surface as `DomainError::Enrichment`.
    pub async fn enrich(
        &self,
        aggregations: &BTreeMap<String, Aggregation>,
        index: &str,
    ) -> Result<Vec<Value>, DomainError> {
        let options = collect_attribute_options(aggregations);

        if options.is_empty() {
            return Ok(Vec::new());
        }

        debug!(index = %index, attributes = options.len(), "Resolving facet attributes");

        let records = tokio::time::timeout(self.timeout, self.service.list(&options, index))
            .await
            .map_err(|_| {
                DomainError::enrichment(format!(
                    "Attribute lookup timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| match e {
                DomainError::Enrichment { .. } => e,
                other => DomainError::enrichment(other.to_string()),
            })?;

        Ok(records
            .iter()
            .map(|record| self.service.to_metadata(record))
            .collect())
    }
}
