use std::net::IpAddr;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::attribute::AttributesConfig;
use crate::infrastructure::backend::BackendConfig;
use crate::infrastructure::cache::{CacheConfig, CacheType};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub observability: ObservabilityConfig,
    pub gateway: GatewayConfig,
    pub backend: BackendConfig,
    pub attributes: AttributesConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Request handling policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Indices clients may search; everything else is rejected
    pub allowed_indices: Vec<String>,
    /// Memoize processed responses in the result cache
    pub output_cache_enabled: bool,
    /// HS256 secret for group tokens; tokens are rejected when unset
    pub group_token_secret: Option<String>,
    /// Bearer token for `/_cache` administration; the endpoints are off when unset
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            allowed_indices: Vec::new(),
            output_cache_enabled: true,
            group_token_secret: None,
            admin_token: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("gateway.allowed_indices")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Checks values serde cannot: addresses, URLs and store selection
    pub fn validate(&self) -> Result<(), DomainError> {
        self.server.host.parse::<IpAddr>().map_err(|e| {
            DomainError::configuration(format!("Invalid server.host '{}': {}", self.server.host, e))
        })?;

        reqwest::Url::parse(&self.backend.base_url).map_err(|e| {
            DomainError::configuration(format!(
                "Invalid backend.base_url '{}': {}",
                self.backend.base_url, e
            ))
        })?;

        if self.backend.timeout_secs == 0 {
            return Err(DomainError::configuration("backend.timeout_secs must be positive"));
        }

        if let Some(url) = &self.attributes.base_url {
            reqwest::Url::parse(url).map_err(|e| {
                DomainError::configuration(format!("Invalid attributes.base_url '{}': {}", url, e))
            })?;
        }

        if self.cache.cache_type()? == CacheType::Redis && self.cache.redis_url.is_none() {
            return Err(DomainError::configuration(
                "cache.redis_url is required when cache.backend is redis",
            ));
        }

        self.observability.validate()?;

        if matches!(&self.gateway.group_token_secret, Some(secret) if secret.is_empty()) {
            return Err(DomainError::configuration(
                "gateway.group_token_secret must not be empty when set",
            ));
        }

        Ok(())
    }
}
