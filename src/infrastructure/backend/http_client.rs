use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use crate::domain::backend::{BackendRequest, BackendResponse, SearchBackend};
use crate::domain::search::{SearchMethod, SEARCH_SUFFIX};
use crate::domain::DomainError;

/// Search backend connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL, e.g. "http://localhost:9200"
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Upper bound for one backend round trip
    pub timeout_secs: u64,
    /// Joins index and entity type into the physical index name
    pub entity_separator: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9200".to_string(),
            username: None,
            password: None,
            timeout_secs: 10,
            entity_separator: "_".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Search backend reached over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpSearchBackend {
    pub fn new(config: BackendConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// `{base}/{index}[{sep}{entity}]/_search`
    pub fn resolve_url(&self, index: &str, entity: Option<&str>) -> String {
        let base = self.config.base_url.trim_end_matches('/');

        match entity {
            Some(entity) => format!(
                "{}/{}{}{}/{}",
                base, index, self.config.entity_separator, entity, SEARCH_SUFFIX
            ),
            None => format!("{}/{}/{}", base, index, SEARCH_SUFFIX),
        }
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: BackendRequest) -> Result<BackendResponse, DomainError> {
        let url = self.resolve_url(&request.index, request.entity.as_deref());
        let method = match request.method {
            SearchMethod::Get => Method::GET,
            SearchMethod::Post => Method::POST,
            SearchMethod::Options => Method::OPTIONS,
        };

        debug!(url = %url, method = %method, "Forwarding search to backend");

        let mut builder = self.client.request(method, &url).json(&request.body);

        if let Some(username) = &self.config.username {
            builder = builder.basic_auth(username, self.config.password.as_deref());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::backend(format!("Failed to read response: {}", e)))?;

        let body = serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::backend(format!("Failed to parse response (HTTP {}): {}", status, e))
        })?;

        Ok(BackendResponse { status, body })
    }
}
