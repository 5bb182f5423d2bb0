//! Search Gateway
//!
//! A caching gateway in front of a document-search backend with:
//! - Index allow-listing and request normalization
//! - Tag-invalidated result caching (in-memory or Redis)
//! - Per-entity result processors with a pass-through default
//! - Facet enrichment from aggregation buckets
//! - Compact and standard response formats

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{
    AttributeEnricher, AttributeService, DisabledGroupTokenDecoder, GroupTokenDecoder,
    NoopAttributeService, PassthroughProcessor, ProcessorRegistry, RequestValidator,
};
use infrastructure::{
    attribute::HttpAttributeService,
    auth::JwtGroupTokenDecoder,
    backend::HttpSearchBackend,
    cache::CacheFactory,
    query::SearchQueryTranslator,
    services::{SearchService, SearchServiceConfig, SearchServiceDeps},
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache = CacheFactory::new().create(&config.cache).await?;

    let backend = Arc::new(HttpSearchBackend::new(config.backend.clone())?);
    info!(base_url = %config.backend.base_url, "Search backend configured");

    let processors = ProcessorRegistry::builder()
        .with_default(Arc::new(PassthroughProcessor))
        .build()?;

    let attributes: Arc<dyn AttributeService> = match &config.attributes.base_url {
        Some(url) => {
            info!(base_url = %url, "Attribute enrichment enabled");
            Arc::new(HttpAttributeService::new(url.clone(), config.attributes.timeout())?)
        }
        None => {
            info!("Attribute service not configured, facets are returned without metadata");
            Arc::new(NoopAttributeService)
        }
    };

    let group_tokens: Arc<dyn GroupTokenDecoder> = match &config.gateway.group_token_secret {
        Some(secret) => Arc::new(JwtGroupTokenDecoder::new(secret)),
        None => Arc::new(DisabledGroupTokenDecoder),
    };

    if config.gateway.allowed_indices.is_empty() {
        warn!("gateway.allowed_indices is empty; every search request will be rejected");
    }

    let deps = SearchServiceDeps {
        validator: RequestValidator::new(config.gateway.allowed_indices.iter().cloned()),
        cache: cache.clone(),
        backend,
        processors: Arc::new(processors),
        enricher: AttributeEnricher::new(attributes, config.attributes.timeout()),
        group_tokens,
        query_builder: Arc::new(SearchQueryTranslator::new()),
    };

    let search_service = SearchService::new(
        deps,
        SearchServiceConfig {
            cache_enabled: config.gateway.output_cache_enabled,
            backend_timeout: config.backend.timeout(),
        },
    );

    info!(
        cache_enabled = search_service.cache_enabled(),
        indices = ?config.gateway.allowed_indices,
        "Search service initialized"
    );

    Ok(AppState::new(Arc::new(search_service), cache)
        .with_admin_token(config.gateway.admin_token.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_with_defaults() {
        let state = create_app_state().await.unwrap();

        assert!(state.search_service.cache_enabled());
        assert!(state.admin_token.is_none());
    }

    #[tokio::test]
    async fn test_create_app_state_honors_gateway_section() {
        let mut config = AppConfig::default();
        config.gateway.output_cache_enabled = false;
        config.gateway.admin_token = Some("s3cret".to_string());
        config.gateway.group_token_secret = Some("key".to_string());

        let state = create_app_state_with_config(&config).await.unwrap();

        assert!(!state.search_service.cache_enabled());
        assert_eq!(state.admin_token.as_deref(), Some("s3cret"));
    }

    #[tokio::test]
    async fn test_unknown_cache_backend_fails() {
        let mut config = AppConfig::default();
        config.cache.backend = "memcached".to_string();

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
