//! Search endpoint: every `/{index}/.../*_search` path

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::search::{SearchParams, SearchRequest};
use crate::infrastructure::services::GatewayResponse;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Hands the raw request to the search service; validation happens there
pub async fn search(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    params: Result<Query<SearchParams>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let request = SearchRequest::new(method.as_str(), uri.path())
        .with_params(params)
        .with_body(body);

    let response = state.search_service.handle(request).await?;

    Ok(into_http_response(response))
}

fn into_http_response(response: GatewayResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut http = match response.body {
        Some(body) => (status, Json(body)).into_response(),
        None => {
            let mut preflight = status.into_response();
            let headers = preflight.headers_mut();
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("content-type"),
            );
            preflight
        }
    };

    let headers = http.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    if let Some(cache_status) = response.cache_status {
        headers.insert("x-cache", HeaderValue::from_static(cache_status.header_value()));
    }

    http
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::services::CacheStatus;
    use serde_json::json;

    #[test]
    fn test_cache_header() {
        let response = into_http_response(GatewayResponse {
            status: 200,
            body: Some(json!({"total": 0, "items": []})),
            cache_status: Some(CacheStatus::Hit),
        });

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-cache"], "HIT");
    }

    #[test]
    fn test_no_cache_header_when_disabled() {
        let response = into_http_response(GatewayResponse {
            status: 200,
            body: Some(json!({})),
            cache_status: None,
        });

        assert!(response.headers().get("x-cache").is_none());
    }

    #[test]
    fn test_preflight_headers() {
        let response = into_http_response(GatewayResponse {
            status: 204,
            body: None,
            cache_status: None,
        });

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            ALLOWED_METHODS
        );
    }

    #[test]
    fn test_backend_status_is_preserved() {
        let response = into_http_response(GatewayResponse {
            status: 404,
            body: Some(json!({"error": "index_not_found"})),
            cache_status: Some(CacheStatus::Miss),
        });

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-cache"], "MISS");
    }
}
