//! Attribute lookup service contract

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::DomainError;

use super::aggregation::AttributeOptions;

/// An attribute as resolved by the attribute service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub attribute_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_input: Option<String>,
    #[serde(default)]
    pub options: Vec<AttributeOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttributeRecord {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            attribute_code: code.into(),
            label: None,
            frontend_input: None,
            options: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(AttributeOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeOption {
    pub value: String,
    pub label: String,
}

/// Resolves attribute codes and option ids into full attribute records
#[async_trait]
pub trait AttributeService: Send + Sync + Debug {
    async fn list(
        &self,
        options: &AttributeOptions,
        index: &str,
    ) -> Result<Vec<AttributeRecord>, DomainError>;

    /// Public facet metadata for a resolved record
    fn to_metadata(&self, record: &AttributeRecord) -> Value {
        json!({
            "code": record.attribute_code,
            "label": record.label.as_deref().unwrap_or(&record.attribute_code),
            "type": record.frontend_input.as_deref().unwrap_or("select"),
            "options": record
                .options
                .iter()
                .map(|o| json!({"value": o.value, "label": o.label}))
                .collect::<Vec<_>>(),
        })
    }
}

/// Service used when no attribute backend is configured
#[derive(Debug, Clone, Default)]
pub struct NoopAttributeService;

#[async_trait]
impl AttributeService for NoopAttributeService {
    async fn list(
        &self,
        _options: &AttributeOptions,
        _index: &str,
    ) -> Result<Vec<AttributeRecord>, DomainError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Echoes requested codes as records, or fails / stalls on demand
    #[derive(Debug, Default)]
    pub struct MockAttributeService {
        error: Option<String>,
        delay: Option<Duration>,
        requests: Mutex<Vec<(AttributeOptions, String)>>,
    }

    impl MockAttributeService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing(error: impl Into<String>) -> Self {
            Self {
                error: Some(error.into()),
                ..Default::default()
            }
        }

        pub fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Default::default()
            }
        }

        pub fn requests(&self) -> Vec<(AttributeOptions, String)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AttributeService for MockAttributeService {
        async fn list(
            &self,
            options: &AttributeOptions,
            index: &str,
        ) -> Result<Vec<AttributeRecord>, DomainError> {
            self.requests
                .lock()
                .unwrap()
                .push((options.clone(), index.to_string()));

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(error) = &self.error {
                return Err(DomainError::enrichment(error));
            }

            Ok(options
                .iter()
                .map(|(code, values)| {
                    values.iter().fold(AttributeRecord::new(code), |record, v| {
                        record.with_option(v, v.to_uppercase())
                    })
                })
                .collect())
        }
    }
}
