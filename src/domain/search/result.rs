//! Backend search result types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw result returned by the search backend.
///
/// Fields the gateway does not interpret are carried through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub took: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
    #[serde(rename = "_shards", default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<Value>,
    pub hits: Hits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<BTreeMap<String, Aggregation>>,
    /// Facet metadata attached by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawSearchResult {
    /// Whether a backend payload carries a hit list worth processing
    pub fn has_hit_list(payload: &Value) -> bool {
        payload
            .get("hits")
            .and_then(|hits| hits.get("hits"))
            .is_some_and(Value::is_array)
    }

    pub fn has_aggregations(&self) -> bool {
        self.aggregations.as_ref().is_some_and(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    /// Either a plain count or `{"value": n, "relation": "eq"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source", default)]
    pub source: Value,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hit {
    pub fn from_source(source: Value) -> Self {
        Self {
            source,
            score: None,
            extra: Map::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Item identifier from `_source.id`, if it is a string or a number
    pub fn identifier(&self) -> Option<String> {
        match self.source.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// An aggregation result; only bucket lists are interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<BucketList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Aggregation {
    pub fn with_buckets(buckets: Vec<Bucket>) -> Self {
        Self {
            buckets: Some(BucketList::List(buckets)),
            extra: Map::new(),
        }
    }

    /// Ordered buckets; keyed bucket maps are not considered
    pub fn bucket_list(&self) -> &[Bucket] {
        match &self.buckets {
            Some(BucketList::List(buckets)) => buckets,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketList {
    List(Vec<Bucket>),
    Keyed(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub key: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bucket {
    pub fn new(key: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            doc_count: None,
            extra: Map::new(),
        }
    }

    /// Bucket key as an option identifier
    pub fn key_string(&self) -> Option<String> {
        match &self.key {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}
