//! Result cache trait definition

use std::collections::BTreeSet;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// A cached response together with its invalidation tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub tags: BTreeSet<String>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, tags: BTreeSet<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            tags,
        }
    }
}

/// Key/value store with a secondary tag index.
///
/// Absence is `Ok(None)`, never an error. Entries are replaced wholesale on
/// `set`; expiry is left to the store.
#[async_trait]
pub trait ResultCache: Send + Sync + Debug {
    /// Gets a stored response body
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores a response body under `key` and indexes it by each tag
    async fn set(&self, key: &str, value: &str, tags: &BTreeSet<String>) -> Result<(), DomainError>;

    /// Removes every entry carrying any of the given tags, returning how many went
    async fn invalidate_tags(&self, tags: &[String]) -> Result<usize, DomainError>;

    /// Removes all entries
    async fn clear(&self) -> Result<(), DomainError>;

    /// Stores a prepared entry
    async fn store(&self, entry: &CacheEntry) -> Result<(), DomainError> {
        self.set(&entry.key, &entry.value, &entry.tags).await
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockResultCache;
    use super::*;

    fn tag_set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let cache = MockResultCache::new();
        let entry = CacheEntry::new("api:abc", r#"{"hits":[]}"#, tag_set(&["product", "P1"]));

        cache.store(&entry).await.unwrap();

        assert_eq!(cache.get("api:abc").await.unwrap(), Some(entry.value.clone()));
        assert_eq!(cache.tags_for("api:abc"), Some(entry.tags));
    }

    #[tokio::test]
    async fn test_absent_key_is_not_an_error() {
        let cache = MockResultCache::new();

        assert_eq!(cache.get("api:missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalidate_tags() {
        let cache = MockResultCache::new();
        cache.set("api:1", "a", &tag_set(&["product", "P1"])).await.unwrap();
        cache.set("api:2", "b", &tag_set(&["product", "P2"])).await.unwrap();
        cache.set("api:3", "c", &tag_set(&["category"])).await.unwrap();

        let removed = cache.invalidate_tags(&["P2".to_string()]).await.unwrap();
        assert_eq!(removed, 1);

        let removed = cache.invalidate_tags(&["product".to_string()]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cache.keys(), vec!["api:3".to_string()]);
    }

    #[tokio::test]
    async fn test_error_mode() {
        let cache = MockResultCache::new().with_error("connection refused");

        assert!(cache.get("api:x").await.is_err());
        assert!(cache.set("api:x", "v", &BTreeSet::new()).await.is_err());
    }
}
