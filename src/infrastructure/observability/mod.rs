//! Observability infrastructure - Tracing, Metrics, and Logging

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_backend_request, record_cache_lookup,
    record_cache_write, record_http_request, CacheLookup, PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
