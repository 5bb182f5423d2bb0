use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::cache;
use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, request_guard_middleware, security_headers_middleware,
};
use super::search;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Prometheus handle plus the path it is served on
pub type MetricsEndpoint = (PrometheusMetrics, String);

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<MetricsEndpoint>) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Cache administration
        .route("/_cache/invalidate", post(cache::invalidate))
        // Everything else is a search path; the service decides what is valid
        .route("/{*path}", any(search::search))
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_guard_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some((handle, path)) = metrics {
        router = router.merge(create_metrics_router(handle, &path));
    }

    router
}
