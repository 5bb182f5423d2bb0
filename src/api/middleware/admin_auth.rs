//! Admin authentication for cache administration endpoints
//!
//! Accepts the configured admin token as `Authorization: Bearer <token>` or
//! `X-Admin-Token: <token>`. Without a configured token the endpoints are off.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Extractor that requires the admin token
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            return Err(ApiError::not_found("Cache administration is disabled"));
        };

        match presented_token(&parts.headers) {
            Some(token) if tokens_match(token, expected) => {
                debug!("Admin access granted");
                Ok(RequireAdmin)
            }
            Some(_) => Err(ApiError::unauthorized("Invalid admin token")),
            None => Err(ApiError::unauthorized(
                "Admin access required. Provide a Bearer token or X-Admin-Token header",
            )),
        }
    }
}

fn presented_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| headers.get("x-admin-token").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Compares digests so the comparison time does not depend on the token prefix
fn tokens_match(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}
