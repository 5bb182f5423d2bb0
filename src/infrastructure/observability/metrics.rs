//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

const HTTP_DURATION: &str = "http_request_duration_seconds";
const BACKEND_DURATION: &str = "search_backend_duration_seconds";

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .unwrap_or_else(|e| panic!("invalid uuid pattern: {}", e))
});

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\d+(/|$)").unwrap_or_else(|e| panic!("invalid numeric pattern: {}", e))
});

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = match latency_buckets(PrometheusBuilder::new(), &config.latency_buckets) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::error!("Invalid latency buckets {:?}: {}", config.latency_buckets, e);
            return None;
        }
    };

    match builder.install_recorder() {
        Ok(handle) => {
            gauge!("search_gateway_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Applies the configured buckets to the request and backend latency histograms
fn latency_buckets(
    builder: PrometheusBuilder,
    buckets: &[f64],
) -> Result<PrometheusBuilder, BuildError> {
    if buckets.is_empty() {
        return Ok(builder);
    }

    builder
        .set_buckets_for_metric(Matcher::Full(HTTP_DURATION.to_string()), buckets)?
        .set_buckets_for_metric(Matcher::Full(BACKEND_DURATION.to_string()), buckets)
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!(HTTP_DURATION, &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Outcome of a result cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
    Error,
}

impl CacheLookup {
    fn as_str(&self) -> &'static str {
        match self {
            CacheLookup::Hit => "hit",
            CacheLookup::Miss => "miss",
            CacheLookup::Error => "error",
        }
    }
}

pub fn record_cache_lookup(entity_type: &str, result: CacheLookup) {
    counter!(
        "search_cache_lookups_total",
        "entity" => entity_type.to_string(),
        "result" => result.as_str()
    )
    .increment(1);
}

pub fn record_cache_write(success: bool) {
    let status = if success { "success" } else { "error" };
    counter!("search_cache_writes_total", "status" => status).increment(1);
}

/// Record a backend round trip; `status` is the HTTP status or "error"
pub fn record_backend_request(index: &str, status: &str, duration: Duration) {
    histogram!(
        BACKEND_DURATION,
        "index" => index.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    if path.len() > 50 {
        path.chars().take(50).collect()
    } else {
        path.to_string()
    }
}
