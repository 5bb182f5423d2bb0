//! `search-query` to native query DSL translation

use serde_json::{json, Map, Value};

use crate::domain::enrichment::AGGREGATION_PREFIXES;
use crate::domain::query::QueryBuilder;
use crate::domain::DomainError;

const KNOWN_KEYS: [&str; 6] = ["query", "filters", "facets", "page", "page_size", "sort"];

/// Translates search-query documents into bool queries with term facets
#[derive(Debug, Clone)]
pub struct SearchQueryTranslator {
    default_page_size: u64,
    max_page_size: u64,
    text_fields: Vec<String>,
}

impl Default for SearchQueryTranslator {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            text_fields: Vec::new(),
        }
    }
}

impl SearchQueryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, default: u64, max: u64) -> Self {
        self.default_page_size = default;
        self.max_page_size = max.max(1);
        self
    }

    /// Restricts full-text matching to the given fields
    pub fn with_text_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    fn must_clause(&self, query: Option<&Value>) -> Result<Value, DomainError> {
        match query {
            None | Some(Value::Null) => Ok(json!({"match_all": {}})),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(json!({"match_all": {}})),
            Some(Value::String(text)) => {
                let mut multi_match = Map::new();
                multi_match.insert("query".to_string(), Value::String(text.clone()));
                if !self.text_fields.is_empty() {
                    multi_match.insert("fields".to_string(), json!(self.text_fields));
                }
                Ok(json!({"multi_match": multi_match}))
            }
            Some(_) => Err(DomainError::validation("'query' must be a string")),
        }
    }

    fn pagination(&self, document: &Map<String, Value>) -> Result<(u64, u64), DomainError> {
        let page = positive_int(document.get("page"), "page")?.unwrap_or(1);
        let size = positive_int(document.get("page_size"), "page_size")?
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size);

        let from = (page - 1)
            .checked_mul(size)
            .ok_or_else(|| DomainError::validation("'page' is out of range"))?;

        Ok((from, size))
    }
}

fn positive_int(value: Option<&Value>, name: &str) -> Result<Option<u64>, DomainError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .filter(|n| *n > 0)
            .map(Some)
            .ok_or_else(|| DomainError::validation(format!("'{}' must be a positive integer", name))),
    }
}

fn filter_clauses(filters: Option<&Value>) -> Result<Vec<Value>, DomainError> {
    let filters = match filters {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(DomainError::validation("'filters' must be an object")),
    };

    filters
        .iter()
        .map(|(field, condition)| match condition {
            Value::Array(values) => Ok(json!({"terms": {field: values}})),
            Value::Object(range) => {
                let mut bounds = Map::new();
                for (key, bound) in range {
                    let op = match key.as_str() {
                        "from" => "gte",
                        "to" => "lte",
                        other => {
                            return Err(DomainError::validation(format!(
                                "Unknown range bound '{}' for filter '{}'",
                                other, field
                            )));
                        }
                    };
                    bounds.insert(op.to_string(), bound.clone());
                }
                Ok(json!({"range": {field: bounds}}))
            }
            Value::Null => Err(DomainError::validation(format!(
                "Filter '{}' has no value",
                field
            ))),
            scalar => Ok(json!({"term": {field: scalar}})),
        })
        .collect()
}

fn sort_clauses(sort: Option<&Value>) -> Result<Option<Value>, DomainError> {
    let entries = match sort {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(DomainError::validation("'sort' must be an array")),
    };

    let mut clauses = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::Object(map) = entry else {
            return Err(DomainError::validation("Sort entries must be objects"));
        };

        for (field, direction) in map {
            match direction.as_str() {
                Some("asc") | Some("desc") => clauses.push(json!({field: {"order": direction}})),
                _ => {
                    return Err(DomainError::validation(format!(
                        "Sort direction for '{}' must be 'asc' or 'desc'",
                        field
                    )));
                }
            }
        }
    }

    Ok(Some(Value::Array(clauses)))
}

fn facet_aggregations(facets: Option<&Value>) -> Result<Option<Value>, DomainError> {
    let facets = match facets {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(facets)) => facets,
        Some(_) => return Err(DomainError::validation("'facets' must be an array")),
    };

    let mut aggs = Map::new();
    for facet in facets {
        let field = facet
            .as_str()
            .ok_or_else(|| DomainError::validation("Facet names must be strings"))?;
        aggs.insert(
            format!("{}{}", AGGREGATION_PREFIXES[0], field),
            json!({"terms": {"field": field}}),
        );
    }

    Ok((!aggs.is_empty()).then_some(Value::Object(aggs)))
}

impl QueryBuilder for SearchQueryTranslator {
    fn build(&self, document: &Map<String, Value>) -> Result<Map<String, Value>, DomainError> {
        if let Some(unknown) = document.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(DomainError::validation(format!(
                "Unknown search-query field: '{}'",
                unknown
            )));
        }

        let must = self.must_clause(document.get("query"))?;
        let filter = filter_clauses(document.get("filters"))?;
        let (from, size) = self.pagination(document)?;

        let mut body = Map::new();
        body.insert(
            "query".to_string(),
            json!({"bool": {"must": [must], "filter": filter}}),
        );
        body.insert("from".to_string(), json!(from));
        body.insert("size".to_string(), json!(size));

        if let Some(sort) = sort_clauses(document.get("sort"))? {
            body.insert("sort".to_string(), sort);
        }

        if let Some(aggs) = facet_aggregations(document.get("facets"))? {
            body.insert("aggs".to_string(), aggs);
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(document: Value) -> Result<Value, DomainError> {
        let Value::Object(map) = document else {
            panic!("test document must be an object");
        };
        SearchQueryTranslator::new().build(&map).map(Value::Object)
    }

    #[test]
    fn test_empty_document_is_match_all() {
        let body = build(json!({})).unwrap();

        assert_eq!(
            body,
            json!({
                "query": {"bool": {"must": [{"match_all": {}}], "filter": []}},
                "from": 0,
                "size": 20
            })
        );
    }

    #[test]
    fn test_full_document() {
        let body = build(json!({
            "query": "red shoes",
            "filters": {
                "brand": "acme",
                "color": ["red", "blue"],
                "price": {"from": 10, "to": 50}
            },
            "facets": ["color"],
            "page": 3,
            "page_size": 10,
            "sort": [{"price": "asc"}]
        }))
        .unwrap();

        assert_eq!(body["query"]["bool"]["must"][0], json!({"multi_match": {"query": "red shoes"}}));

        let filter = body["query"]["bool"]["filter"].as_array().unwrap();
        assert!(filter.contains(&json!({"term": {"brand": "acme"}})));
        assert!(filter.contains(&json!({"terms": {"color": ["red", "blue"]}})));
        assert!(filter.contains(&json!({"range": {"price": {"gte": 10, "lte": 50}}})));

        assert_eq!(body["from"], json!(20));
        assert_eq!(body["size"], json!(10));
        assert_eq!(body["sort"], json!([{"price": {"order": "asc"}}]));
        assert_eq!(body["aggs"], json!({"agg_terms_color": {"terms": {"field": "color"}}}));
    }

    #[test]
    fn test_text_fields_and_page_size_cap() {
        let map = json!({"query": "boots", "page_size": 500});
        let body = SearchQueryTranslator::new()
            .with_text_fields(["name", "description"])
            .with_page_size(20, 50)
            .build(map.as_object().unwrap())
            .unwrap();

        assert_eq!(
            body["query"]["bool"]["must"][0],
            json!({"multi_match": {"query": "boots", "fields": ["name", "description"]}})
        );
        assert_eq!(body["size"], json!(50));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = build(json!({"query": "x", "limit": 5})).unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(build(json!({"page": 0})).is_err());
        assert!(build(json!({"query": 5})).is_err());
        assert!(build(json!({"sort": [{"price": "up"}]})).is_err());
        assert!(build(json!({"filters": {"price": {"above": 3}}})).is_err());
        assert!(build(json!({"facets": [1]})).is_err());
    }

    #[test]
    fn test_page_overflow_rejected() {
        let err = build(json!({"page": u64::MAX, "page_size": 20})).unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_last_representable_page() {
        let body = build(json!({"page": 3, "page_size": 20})).unwrap();

        assert_eq!(body["from"], json!(40));
        assert_eq!(body["size"], json!(20));
    }
}
