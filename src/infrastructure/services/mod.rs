//! Infrastructure services

mod search_service;

pub use search_service::{
    CacheStatus, GatewayResponse, SearchService, SearchServiceConfig, SearchServiceDeps,
};
