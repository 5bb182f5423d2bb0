//! Request validation rules

use std::collections::HashSet;

use crate::domain::DomainError;

use super::request::{RequestFormat, ResponseFormat, SearchMethod, SearchRequest};

/// Suffix every search path must end with
pub const SEARCH_SUFFIX: &str = "_search";

/// Index and entity extracted from a search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    pub index: String,
    pub entity: Option<String>,
}

impl SearchPath {
    /// Entity type used for dispatch and tagging; falls back to the index name
    pub fn entity_type(&self) -> &str {
        self.entity.as_deref().unwrap_or(&self.index)
    }
}

/// A request that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub method: SearchMethod,
    pub path: SearchPath,
    pub request_format: RequestFormat,
    pub response_format: ResponseFormat,
}

/// Validates method, path shape and index allow-list
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    allowed_indices: HashSet<String>,
}

impl RequestValidator {
    pub fn new<I, S>(allowed_indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_indices: allowed_indices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_allowed(&self, index: &str) -> bool {
        self.allowed_indices.contains(index)
    }

    pub fn validate(&self, request: &SearchRequest) -> Result<ValidatedRequest, DomainError> {
        let method = SearchMethod::parse(&request.method)?;
        let path = self.validate_path(&request.path)?;
        let request_format = RequestFormat::parse(request.params.request_format.as_deref())?;
        let response_format = ResponseFormat::parse(request.params.response_format.as_deref())?;

        Ok(ValidatedRequest {
            method,
            path,
            request_format,
            response_format,
        })
    }

    fn validate_path(&self, path: &str) -> Result<SearchPath, DomainError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let index = segments
            .first()
            .ok_or_else(|| DomainError::validation("Request path must start with an index name"))?;

        if !self.is_allowed(index) {
            return Err(DomainError::validation(format!(
                "Index '{}' is not allowed",
                index
            )));
        }

        let last = segments.last().copied().unwrap_or_default();

        if segments.len() < 2 || !last.ends_with(SEARCH_SUFFIX) {
            return Err(DomainError::validation(format!(
                "Path '{}' does not denote a search operation",
                path
            )));
        }

        let entity = last
            .strip_suffix(SEARCH_SUFFIX)
            .map(|e| e.trim_end_matches('_'))
            .filter(|e| !e.is_empty())
            .map(String::from);

        Ok(SearchPath {
            index: index.to_string(),
            entity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> RequestValidator {
        RequestValidator::new(["catalog", "myindex"])
    }

    #[test]
    fn test_entity_search_path() {
        let request = SearchRequest::new("GET", "/catalog/product_search");
        let validated = validator().validate(&request).unwrap();

        assert_eq!(validated.method, SearchMethod::Get);
        assert_eq!(validated.path.index, "catalog");
        assert_eq!(validated.path.entity.as_deref(), Some("product"));
        assert_eq!(validated.path.entity_type(), "product");
    }

    #[test]
    fn test_bare_search_path() {
        let request = SearchRequest::new("POST", "/catalog/_search");
        let validated = validator().validate(&request).unwrap();

        assert_eq!(validated.path.entity, None);
        assert_eq!(validated.path.entity_type(), "catalog");
    }

    #[test]
    fn test_rejects_bad_method() {
        let request = SearchRequest::new("PUT", "/catalog/product_search");
        let err = validator().validate(&request).unwrap_err();

        assert!(err.to_string().contains("Unsupported method"));
    }

    #[test]
    fn test_rejects_empty_path() {
        let err = validator().validate(&SearchRequest::new("GET", "/")).unwrap_err();

        assert!(err.to_string().contains("index name"));
    }

    #[test]
    fn test_rejects_unknown_index() {
        let request = SearchRequest::new("GET", "/secret/product_search");
        let err = validator().validate(&request).unwrap_err();

        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn test_rejects_non_search_operation() {
        for path in ["/catalog", "/catalog/product", "/catalog/_doc/1"] {
            let err = validator()
                .validate(&SearchRequest::new("GET", path))
                .unwrap_err();
            assert!(err.to_string().contains("search operation"), "{}", path);
        }
    }

    #[test]
    fn test_rejects_unknown_response_format() {
        let request = SearchRequest::new("GET", "/catalog/_search").with_params(
            super::super::request::SearchParams {
                response_format: Some("yaml".to_string()),
                ..Default::default()
            },
        );

        assert!(validator().validate(&request).is_err());
    }
}
