//! In-memory result cache implementation using moka

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::ResultCache;
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Time-to-live of every entry
    pub ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Clone)]
struct CachedResponse {
    value: Arc<str>,
    tags: Arc<BTreeSet<String>>,
    /// Write that produced this entry; index links carry the same number
    generation: u64,
}

/// tag → (key → generation of the write that indexed it)
type TagIndex = Arc<RwLock<HashMap<String, HashMap<String, u64>>>>;

/// Process-local result cache.
///
/// Entries expire after the configured TTL or are evicted when capacity is
/// reached; the tag index is pruned from moka's eviction listener.
#[derive(Debug)]
pub struct InMemoryResultCache {
    cache: MokaCache<String, CachedResponse>,
    tag_index: TagIndex,
    generation: AtomicU64,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let tag_index: TagIndex = Arc::new(RwLock::new(HashMap::new()));
        let listener_index = tag_index.clone();

        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .eviction_listener(move |key: Arc<String>, entry: CachedResponse, _cause| {
                // A newer write under the same key owns every link it re-indexed
                unindex_generation(&listener_index, &key, entry.generation, entry.tags.iter());
            })
            .build();

        Self {
            cache,
            tag_index,
            generation: AtomicU64::new(0),
        }
    }

    /// Number of entries, after running pending maintenance
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops `key` from `tags`, whatever generation indexed it
fn unindex<'a>(index: &TagIndex, key: &str, tags: impl Iterator<Item = &'a String>) {
    unindex_where(index, key, tags, |_| true);
}

/// Drops `key` from `tags` only where the link belongs to `generation`
fn unindex_generation<'a>(
    index: &TagIndex,
    key: &str,
    generation: u64,
    tags: impl Iterator<Item = &'a String>,
) {
    unindex_where(index, key, tags, |indexed| indexed == generation);
}

fn unindex_where<'a>(
    index: &TagIndex,
    key: &str,
    tags: impl Iterator<Item = &'a String>,
    matches: impl Fn(u64) -> bool,
) {
    let mut index = index.write().unwrap_or_else(PoisonError::into_inner);

    for tag in tags {
        if let Some(keys) = index.get_mut(tag) {
            if keys.get(key).is_some_and(|&indexed| matches(indexed)) {
                keys.remove(key);
            }

            if keys.is_empty() {
                index.remove(tag);
            }
        }
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.cache.get(key).await.map(|entry| entry.value.to_string()))
    }

    async fn set(&self, key: &str, value: &str, tags: &BTreeSet<String>) -> Result<(), DomainError> {
        if let Some(previous) = self.cache.get(key).await {
            unindex(&self.tag_index, key, previous.tags.difference(tags));
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        {
            let mut index = self.tag_index.write().unwrap_or_else(PoisonError::into_inner);
            for tag in tags {
                index
                    .entry(tag.clone())
                    .or_default()
                    .insert(key.to_string(), generation);
            }
        }

        let entry = CachedResponse {
            value: Arc::from(value),
            tags: Arc::new(tags.clone()),
            generation,
        };
        self.cache.insert(key.to_string(), entry).await;

        Ok(())
    }

    async fn invalidate_tags(&self, tags: &[String]) -> Result<usize, DomainError> {
        let keys: HashSet<String> = {
            let index = self.tag_index.read().unwrap_or_else(PoisonError::into_inner);
            tags.iter()
                .filter_map(|tag| index.get(tag))
                .flat_map(|keys| keys.keys())
                .cloned()
                .collect()
        };

        let mut removed = 0;

        for key in keys {
            if self.cache.remove(&key).await.is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        self.tag_index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryResultCache::new();

        cache
            .set("api:1", r#"{"hits":{"hits":[]}}"#, &tag_set(&["product"]))
            .await
            .unwrap();

        assert_eq!(
            cache.get("api:1").await.unwrap(),
            Some(r#"{"hits":{"hits":[]}}"#.to_string())
        );
        assert_eq!(cache.get("api:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalidate_by_item_tag() {
        let cache = InMemoryResultCache::new();
        cache.set("api:1", "a", &tag_set(&["product", "P7"])).await.unwrap();
        cache.set("api:2", "b", &tag_set(&["product", "P9"])).await.unwrap();

        let removed = cache.invalidate_tags(&["P7".to_string()]).await.unwrap();

        assert_eq!(removed, 1);
        assert_eq!(cache.get("api:1").await.unwrap(), None);
        assert_eq!(cache.get("api:2").await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_invalidate_by_entity_tag() {
        let cache = InMemoryResultCache::new();
        cache.set("api:1", "a", &tag_set(&["product", "P7"])).await.unwrap();
        cache.set("api:2", "b", &tag_set(&["product", "P9"])).await.unwrap();
        cache.set("api:3", "c", &tag_set(&["category"])).await.unwrap();

        let removed = cache
            .invalidate_tags(&["product".to_string(), "P9".to_string()])
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(cache.get("api:3").await.unwrap(), Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_replacement_drops_stale_tags() {
        let cache = InMemoryResultCache::new();
        cache.set("api:1", "old", &tag_set(&["product", "P7"])).await.unwrap();
        cache.set("api:1", "new", &tag_set(&["product", "P8"])).await.unwrap();

        assert_eq!(cache.invalidate_tags(&["P7".to_string()]).await.unwrap(), 0);
        assert_eq!(cache.get("api:1").await.unwrap(), Some("new".to_string()));
        assert_eq!(cache.invalidate_tags(&["P8".to_string()]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryResultCache::new();
        cache.set("api:1", "a", &tag_set(&["product"])).await.unwrap();

        cache.clear().await.unwrap();

        assert_eq!(cache.get("api:1").await.unwrap(), None);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = InMemoryResultCache::with_config(
            InMemoryCacheConfig::default().with_ttl(Duration::from_millis(50)),
        );
        cache.set("api:1", "a", &tag_set(&["product"])).await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.get("api:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rewrite_after_expiry_stays_invalidatable() {
        let cache = InMemoryResultCache::with_config(
            InMemoryCacheConfig::default().with_ttl(Duration::from_millis(50)),
        );
        cache.set("api:1", "old", &tag_set(&["product", "P7"])).await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get("api:1").await.unwrap(), None);

        cache.set("api:1", "new", &tag_set(&["product", "P7"])).await.unwrap();
        cache.cache.run_pending_tasks().await;

        assert_eq!(cache.invalidate_tags(&["P7".to_string()]).await.unwrap(), 1);
        assert_eq!(cache.get("api:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_leaves_no_index_links() {
        let cache = InMemoryResultCache::with_config(
            InMemoryCacheConfig::default().with_ttl(Duration::from_millis(50)),
        );
        cache.set("api:1", "a", &tag_set(&["product"])).await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;
        cache.cache.run_pending_tasks().await;

        assert!(cache.tag_index.read().unwrap().is_empty());
    }
}
