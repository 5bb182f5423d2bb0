//! Inbound search request types

use std::fmt;

use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Body field carrying an opaque group token
pub const GROUP_TOKEN_FIELD: &str = "groupToken";

/// Body field carrying a plain group identifier
pub const GROUP_ID_FIELD: &str = "groupId";

/// HTTP methods accepted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    Get,
    Post,
    Options,
}

impl SearchMethod {
    pub fn parse(method: &str) -> Result<Self, DomainError> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "OPTIONS" => Ok(Self::Options),
            other => Err(DomainError::validation(format!(
                "Unsupported method '{}'. Allowed methods: GET, POST, OPTIONS",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representation of the incoming body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestFormat {
    /// Backend-native query DSL, forwarded as-is
    #[default]
    Native,
    /// Higher-level search query, translated before forwarding
    SearchQuery,
}

impl RequestFormat {
    pub fn parse(value: Option<&str>) -> Result<Self, DomainError> {
        match value.map(str::trim) {
            None | Some("") | Some("native") => Ok(Self::Native),
            Some("search-query") => Ok(Self::SearchQuery),
            Some(other) => Err(DomainError::validation(format!(
                "Unknown request_format '{}'. Expected 'search-query'",
                other
            ))),
        }
    }
}

/// Output shape of a search response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Standard,
    Compact,
}

impl ResponseFormat {
    pub fn parse(value: Option<&str>) -> Result<Self, DomainError> {
        match value.map(str::trim) {
            None | Some("") | Some("standard") => Ok(Self::Standard),
            Some("compact") => Ok(Self::Compact),
            Some(other) => Err(DomainError::validation(format!(
                "Unknown response_format '{}'. Expected 'standard' or 'compact'",
                other
            ))),
        }
    }
}

/// Query-string parameters understood by the gateway
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// URL-decoded JSON body (GET only)
    pub request: Option<String>,
    pub request_format: Option<String>,
    pub response_format: Option<String>,
}

/// A search request as received from the transport layer
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub method: String,
    pub path: String,
    pub params: SearchParams,
    pub body: Bytes,
}

impl SearchRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: SearchParams::default(),
            body: Bytes::new(),
        }
    }

    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Parses the JSON body for the given method.
    ///
    /// GET reads the `request` parameter, POST the raw body. Missing input is
    /// an empty object; anything other than a JSON object is rejected.
    pub fn parse_body(&self, method: SearchMethod) -> Result<Map<String, Value>, DomainError> {
        let raw: &[u8] = match method {
            SearchMethod::Get => self
                .params
                .request
                .as_deref()
                .map(str::as_bytes)
                .unwrap_or_default(),
            SearchMethod::Post => &self.body,
            SearchMethod::Options => &[],
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(DomainError::validation(
                "Search request body must be a JSON object",
            )),
            Err(e) => Err(DomainError::validation(format!(
                "Invalid JSON in search request: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(SearchMethod::parse("GET").unwrap(), SearchMethod::Get);
        assert_eq!(SearchMethod::parse("post").unwrap(), SearchMethod::Post);
        assert_eq!(SearchMethod::parse("OPTIONS").unwrap(), SearchMethod::Options);

        let err = SearchMethod::parse("PUT").unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("PUT"));
    }

    #[test]
    fn test_formats() {
        assert_eq!(ResponseFormat::parse(None).unwrap(), ResponseFormat::Standard);
        assert_eq!(
            ResponseFormat::parse(Some("compact")).unwrap(),
            ResponseFormat::Compact
        );
        assert!(ResponseFormat::parse(Some("xml")).is_err());

        assert_eq!(RequestFormat::parse(None).unwrap(), RequestFormat::Native);
        assert_eq!(
            RequestFormat::parse(Some("search-query")).unwrap(),
            RequestFormat::SearchQuery
        );
        assert!(RequestFormat::parse(Some("sql")).is_err());
    }

    #[test]
    fn test_get_body_from_param() {
        let request = SearchRequest::new("GET", "/catalog/_search").with_params(SearchParams {
            request: Some(r#"{"size":5}"#.to_string()),
            ..Default::default()
        });

        let body = request.parse_body(SearchMethod::Get).unwrap();
        assert_eq!(body.get("size"), Some(&Value::from(5)));
    }

    #[test]
    fn test_get_without_param_is_empty() {
        let request = SearchRequest::new("GET", "/catalog/_search");

        assert!(request.parse_body(SearchMethod::Get).unwrap().is_empty());
    }

    #[test]
    fn test_post_body() {
        let request = SearchRequest::new("POST", "/catalog/_search").with_body(r#"{"from":10}"#);

        let body = request.parse_body(SearchMethod::Post).unwrap();
        assert_eq!(body.get("from"), Some(&Value::from(10)));
    }

    #[test]
    fn test_non_object_body_rejected() {
        let request = SearchRequest::new("POST", "/catalog/_search").with_body("[1,2]");
        assert!(request.parse_body(SearchMethod::Post).is_err());

        let request = SearchRequest::new("POST", "/catalog/_search").with_body("{oops");
        assert!(request.parse_body(SearchMethod::Post).is_err());
    }
}
