//! Cache administration endpoints

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Deserialize)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub tags: Vec<String>,
    /// Drop every cached response
    #[serde(default)]
    pub all: bool,
}

/// `{"invalidated": n}` for tag invalidation, `{"cleared": true}` for a full clear
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum InvalidateResponse {
    Invalidated { invalidated: usize },
    Cleared { cleared: bool },
}

/// POST /_cache/invalidate
pub async fn invalidate(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    if request.all {
        state.cache.clear().await?;
        info!("Result cache cleared");

        return Ok(Json(InvalidateResponse::Cleared { cleared: true }));
    }

    let tags: Vec<String> = request
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if tags.is_empty() {
        return Err(
            ApiError::bad_request("Provide a non-empty 'tags' list or 'all': true")
                .with_param("tags"),
        );
    }

    let invalidated = state.cache.invalidate_tags(&tags).await?;
    info!(tags = ?tags, invalidated, "Invalidated cached responses");

    Ok(Json(InvalidateResponse::Invalidated { invalidated }))
}
