//! Search request orchestration
//!
//! Drives one request through validation, normalization, the result cache,
//! the backend, per-entity processing, facet enrichment and formatting.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::domain::auth::GroupTokenDecoder;
use crate::domain::backend::{BackendRequest, BackendResponse, SearchBackend};
use crate::domain::cache::{fingerprint, tags, CacheEntry, ResultCache};
use crate::domain::enrichment::AttributeEnricher;
use crate::domain::processor::{ProcessContext, ProcessorRegistry, PRODUCT_ENTITY};
use crate::domain::query::QueryBuilder;
use crate::domain::search::{
    RawSearchResult, RequestFormat, RequestValidator, SearchMethod, SearchRequest,
    ValidatedRequest, GROUP_ID_FIELD, GROUP_TOKEN_FIELD,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_backend_request, record_cache_lookup, record_cache_write, CacheLookup,
};

/// Whether a response was served from the result cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn header_value(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Final outcome of a search request
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    /// `None` for preflight answers
    pub body: Option<Value>,
    /// Set only when the result cache is enabled
    pub cache_status: Option<CacheStatus>,
}

impl GatewayResponse {
    fn preflight() -> Self {
        Self {
            status: 204,
            body: None,
            cache_status: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchServiceConfig {
    pub cache_enabled: bool,
    pub backend_timeout: Duration,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            backend_timeout: Duration::from_secs(10),
        }
    }
}

/// Collaborators injected into the orchestrator
#[derive(Debug, Clone)]
pub struct SearchServiceDeps {
    pub validator: RequestValidator,
    pub cache: Arc<dyn ResultCache>,
    pub backend: Arc<dyn SearchBackend>,
    pub processors: Arc<ProcessorRegistry>,
    pub enricher: AttributeEnricher,
    pub group_tokens: Arc<dyn GroupTokenDecoder>,
    pub query_builder: Arc<dyn QueryBuilder>,
}

#[derive(Debug)]
pub struct SearchService {
    validator: RequestValidator,
    cache: Arc<dyn ResultCache>,
    backend: Arc<dyn SearchBackend>,
    processors: Arc<ProcessorRegistry>,
    enricher: AttributeEnricher,
    group_tokens: Arc<dyn GroupTokenDecoder>,
    query_builder: Arc<dyn QueryBuilder>,
    config: SearchServiceConfig,
}

impl SearchService {
    pub fn new(deps: SearchServiceDeps, config: SearchServiceConfig) -> Self {
        Self {
            validator: deps.validator,
            cache: deps.cache,
            backend: deps.backend,
            processors: deps.processors,
            enricher: deps.enricher,
            group_tokens: deps.group_tokens,
            query_builder: deps.query_builder,
            config,
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.config.cache_enabled
    }

    pub async fn handle(&self, request: SearchRequest) -> Result<GatewayResponse, DomainError> {
        let validated = self.validator.validate(&request)?;
        let entity_type = validated.path.entity_type().to_string();

        info!(
            method = %validated.method,
            index = %validated.path.index,
            entity = %entity_type,
            "Search request accepted"
        );

        if validated.method == SearchMethod::Options {
            return Ok(GatewayResponse::preflight());
        }

        let mut body = request.parse_body(validated.method)?;
        let group_id = self.extract_group_id(&mut body)?;

        if validated.request_format == RequestFormat::SearchQuery {
            body = self.query_builder.build(&body)?;
        }

        let cache_key = self
            .config
            .cache_enabled
            .then(|| fingerprint(&Value::Object(body.clone()), &request.path).cache_key());

        if let Some(key) = &cache_key {
            if let Some(cached) = self.lookup(key, &entity_type).await {
                info!(key = %key, entity = %entity_type, "Serving search from cache");
                return Ok(GatewayResponse {
                    status: 200,
                    body: Some(validated.response_format.apply(&cached)?),
                    cache_status: Some(CacheStatus::Hit),
                });
            }

            info!(key = %key, entity = %entity_type, "Cache miss, querying backend");
        }

        let cache_status = cache_key.as_ref().map(|_| CacheStatus::Miss);
        let response = self.call_backend(&validated, body).await?;

        if !RawSearchResult::has_hit_list(&response.body) {
            debug!(status = response.status, "Backend payload has no hit list, passing through");
            return Ok(GatewayResponse {
                status: response.status,
                body: Some(response.body),
                cache_status,
            });
        }

        let mut result: RawSearchResult = serde_json::from_value(response.body)
            .map_err(|e| DomainError::backend(format!("Malformed search result: {}", e)))?;

        self.process(&validated, &entity_type, group_id, &mut result)
            .await?;

        if let Some(key) = cache_key {
            if (200..300).contains(&response.status) {
                self.spawn_cache_write(key, &entity_type, &result);
            }
        }

        Ok(GatewayResponse {
            status: response.status,
            body: Some(validated.response_format.apply(&result)?),
            cache_status,
        })
    }

    /// Removes both group fields; a token takes precedence over a plain id
    fn extract_group_id(&self, body: &mut Map<String, Value>) -> Result<Option<String>, DomainError> {
        let token = body.remove(GROUP_TOKEN_FIELD);
        let explicit = body.remove(GROUP_ID_FIELD);

        match token {
            Some(Value::String(token)) if !token.is_empty() => {
                return self.group_tokens.decode(&token).map(Some);
            }
            Some(Value::Null) | Some(Value::String(_)) | None => {}
            Some(_) => return Err(DomainError::auth("groupToken must be a string")),
        }

        Ok(match explicit {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        })
    }

    /// Cached result for a key; faults and undecodable values count as misses
    async fn lookup(&self, key: &str, entity_type: &str) -> Option<RawSearchResult> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_str(&value) {
                Ok(result) => {
                    record_cache_lookup(entity_type, CacheLookup::Hit);
                    Some(result)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                    record_cache_lookup(entity_type, CacheLookup::Error);
                    None
                }
            },
            Ok(None) => {
                record_cache_lookup(entity_type, CacheLookup::Miss);
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                record_cache_lookup(entity_type, CacheLookup::Error);
                None
            }
        }
    }

    async fn call_backend(
        &self,
        validated: &ValidatedRequest,
        body: Map<String, Value>,
    ) -> Result<BackendResponse, DomainError> {
        let index = &validated.path.index;
        let request = BackendRequest {
            method: validated.method,
            index: index.clone(),
            entity: validated.path.entity.clone(),
            body,
        };

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.config.backend_timeout, self.backend.search(request)).await;

        match outcome {
            Ok(Ok(response)) => {
                record_backend_request(index, &response.status.to_string(), started.elapsed());
                Ok(response)
            }
            Ok(Err(e)) => {
                record_backend_request(index, "error", started.elapsed());
                Err(e)
            }
            Err(_) => {
                record_backend_request(index, "timeout", started.elapsed());
                Err(DomainError::backend(format!(
                    "Backend did not answer within {}ms",
                    self.config.backend_timeout.as_millis()
                )))
            }
        }
    }

    /// Runs the entity processor and, for products, facet enrichment
    async fn process(
        &self,
        validated: &ValidatedRequest,
        entity_type: &str,
        group_id: Option<String>,
        result: &mut RawSearchResult,
    ) -> Result<(), DomainError> {
        let index = &validated.path.index;
        let is_product = entity_type == PRODUCT_ENTITY;

        let processor = self.processors.resolve(entity_type);
        let context = ProcessContext::new(index.as_str())
            .with_group_id(if is_product { group_id } else { None });

        let hits = std::mem::take(&mut result.hits.hits);
        result.hits.hits = processor.process(hits, &context).await.map_err(|e| {
            error!(
                processor = processor.name(),
                entity = %entity_type,
                error = %e,
                "Result processing failed"
            );
            match e {
                DomainError::Processor { .. } => e,
                other => DomainError::processor(entity_type, other.to_string()),
            }
        })?;

        if is_product {
            if let Some(aggregations) = result.aggregations.as_ref().filter(|a| !a.is_empty()) {
                result.metadata = Some(self.enricher.enrich(aggregations, index).await?);
            }
        }

        Ok(())
    }

    /// Stores the processed result without delaying the response
    fn spawn_cache_write(&self, key: String, entity_type: &str, result: &RawSearchResult) {
        let value = match serde_json::to_string(result) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize result for caching");
                record_cache_write(false);
                return;
            }
        };

        let entry = CacheEntry::new(
            key,
            value,
            tags(entity_type, &result.hits.hits, self.config.cache_enabled),
        );
        let cache = self.cache.clone();

        tokio::spawn(async move {
            match cache.store(&entry).await {
                Ok(()) => {
                    debug!(key = %entry.key, tags = entry.tags.len(), "Cached search result");
                    record_cache_write(true);
                }
                Err(e) => {
                    warn!(key = %entry.key, error = %e, "Cache write failed");
                    record_cache_write(false);
                }
            }
        });
    }
}
