//! Response formatting

use serde_json::{Map, Value};

use crate::domain::DomainError;

use super::request::ResponseFormat;
use super::result::{Hit, RawSearchResult};

impl ResponseFormat {
    /// Renders a processed result in this format
    pub fn apply(self, result: &RawSearchResult) -> Result<Value, DomainError> {
        match self {
            Self::Standard => serde_json::to_value(result).map_err(serialization_error),
            Self::Compact => compact(result),
        }
    }
}

/// Drops transport metadata and flattens hits into their sources
fn compact(result: &RawSearchResult) -> Result<Value, DomainError> {
    let mut out = result.extra.clone();

    out.insert(
        "total".to_string(),
        result.hits.total.clone().unwrap_or(Value::Null),
    );
    out.insert(
        "items".to_string(),
        Value::Array(result.hits.hits.iter().map(compact_hit).collect()),
    );

    if let Some(aggregations) = &result.aggregations {
        out.insert(
            "aggregations".to_string(),
            serde_json::to_value(aggregations).map_err(serialization_error)?,
        );
    }

    if let Some(metadata) = &result.metadata {
        out.insert("metadata".to_string(), Value::Array(metadata.clone()));
    }

    Ok(Value::Object(out))
}

fn serialization_error(e: serde_json::Error) -> DomainError {
    DomainError::internal(format!("Failed to serialize search response: {}", e))
}

fn compact_hit(hit: &Hit) -> Value {
    let mut item = match &hit.source {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("_source".to_string(), other.clone());
            map
        }
    };

    item.insert(
        "_score".to_string(),
        hit.score.map(Value::from).unwrap_or(Value::Null),
    );

    Value::Object(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result() -> RawSearchResult {
        serde_json::from_value(json!({
            "took": 4,
            "timed_out": false,
            "_shards": {"total": 1},
            "hits": {
                "total": 2,
                "max_score": 2.0,
                "hits": [
                    {"_id": "1", "_score": 2.0, "_source": {"id": "1", "name": "Shirt"}},
                    {"_id": "2", "_score": 1.0, "_source": {"id": "2", "name": "Hat"}}
                ]
            },
            "aggregations": {"agg_terms_color": {"buckets": [{"key": "red", "doc_count": 1}]}}
        }))
        .unwrap()
    }

    #[test]
    fn test_standard_is_unchanged() {
        let raw = result();
        let value = ResponseFormat::Standard.apply(&raw).unwrap();

        assert_eq!(value["took"], json!(4));
        assert_eq!(value["hits"]["max_score"], json!(2.0));
        assert_eq!(value["hits"]["hits"][1]["_source"]["name"], json!("Hat"));
    }

    #[test]
    fn test_compact_strips_transport_fields() {
        let raw = result();
        let value = ResponseFormat::Compact.apply(&raw).unwrap();
        let obj = value.as_object().unwrap();

        assert!(!obj.contains_key("took"));
        assert!(!obj.contains_key("timed_out"));
        assert!(!obj.contains_key("_shards"));
        assert!(!obj.contains_key("max_score"));
        assert!(!obj.contains_key("hits"));
        assert_eq!(obj["total"], raw.hits.total.clone().unwrap());
    }

    #[test]
    fn test_compact_flattens_items() {
        let value = ResponseFormat::Compact.apply(&result()).unwrap();
        let items = value["items"].as_array().unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0], json!({"id": "1", "name": "Shirt", "_score": 2.0}));
        assert!(value["aggregations"]["agg_terms_color"].is_object());
    }

    #[test]
    fn test_compact_keeps_object_total() {
        let mut raw = result();
        raw.hits.total = Some(json!({"value": 120, "relation": "gte"}));

        let value = ResponseFormat::Compact.apply(&raw).unwrap();

        assert_eq!(value["total"], json!({"value": 120, "relation": "gte"}));
    }

    #[test]
    fn test_compact_serializes_aggregation_buckets() {
        let value = ResponseFormat::Compact.apply(&result()).unwrap();

        assert_eq!(
            value["aggregations"]["agg_terms_color"]["buckets"][0]["key"],
            json!("red")
        );
        assert_ne!(value["aggregations"], Value::Null);
    }

    #[test]
    fn test_compact_without_aggregations() {
        let mut raw = result();
        raw.aggregations = None;

        let value = ResponseFormat::Compact.apply(&raw).unwrap();

        assert!(!value.as_object().unwrap().contains_key("aggregations"));
    }
}
