use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::enrichment::{AttributeOptions, AttributeRecord, AttributeService};
use crate::domain::DomainError;

/// Attribute service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttributesConfig {
    /// Attribute service base URL; enrichment is disabled when unset
    pub base_url: Option<String>,
    /// Upper bound for one attribute lookup
    pub timeout_secs: u64,
}

impl Default for AttributesConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 5,
        }
    }
}

impl AttributesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize)]
struct AttributeLookup<'a> {
    index: &'a str,
    attributes: &'a AttributeOptions,
}

/// Attribute service reached over HTTP
///
/// `POST {base_url}/attributes` with `{"index": .., "attributes": {code: [option ids]}}`,
/// answered by a JSON array of attribute records.
#[derive(Debug, Clone)]
pub struct HttpAttributeService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAttributeService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AttributeService for HttpAttributeService {
    async fn list(
        &self,
        options: &AttributeOptions,
        index: &str,
    ) -> Result<Vec<AttributeRecord>, DomainError> {
        let url = format!("{}/attributes", self.base_url);
        debug!(url = %url, attributes = options.len(), "Looking up attributes");

        let response = self
            .client
            .post(&url)
            .json(&AttributeLookup {
                index,
                attributes: options,
            })
            .send()
            .await
            .map_err(|e| DomainError::enrichment(format!("Attribute request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::enrichment(format!(
                "Attribute service returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<Vec<AttributeRecord>>()
            .await
            .map_err(|e| DomainError::enrichment(format!("Invalid attribute response: {}", e)))
    }
}
