//! Search backend infrastructure

mod http_client;

pub use http_client::{BackendConfig, HttpSearchBackend};
