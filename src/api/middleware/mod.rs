//! API middleware components

pub mod admin_auth;
pub mod logging;
pub mod metrics;
pub mod security;

pub use admin_auth::RequireAdmin;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::{request_guard_middleware, security_headers_middleware};
