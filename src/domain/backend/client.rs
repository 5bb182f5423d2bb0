//! Search backend contract

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::search::SearchMethod;
use crate::domain::DomainError;

/// A normalized request forwarded to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: SearchMethod,
    pub index: String,
    pub entity: Option<String>,
    pub body: Map<String, Value>,
}

/// Backend answer; any status with a JSON body is a response, not an error
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: Value,
}

impl BackendResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// Document-search backend
#[async_trait]
pub trait SearchBackend: Send + Sync + Debug {
    /// Executes a search. Only transport and decoding failures are errors.
    async fn search(&self, request: BackendRequest) -> Result<BackendResponse, DomainError>;
}
