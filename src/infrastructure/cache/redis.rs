//! Redis result cache implementation

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::ResultCache;
use crate::domain::DomainError;

/// Namespace of the per-tag key sets
const TAG_NAMESPACE: &str = "tag:";

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// TTL applied to entries and their tag sets
    pub ttl: Duration,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            ttl: Duration::from_secs(3600),
            key_prefix: None,
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Shared result cache backed by Redis.
///
/// Each tag is a Redis set of the (unprefixed) response keys carrying it.
/// Entry and tag memberships are written in one MULTI/EXEC pipeline.
#[derive(Clone)]
pub struct RedisResultCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisResultCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisResultCache {
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn tag_key(&self, tag: &str) -> String {
        self.prefix_key(&format!("{}{}", TAG_NAMESPACE, tag))
    }

    fn ttl_secs(&self) -> u64 {
        self.config.ttl.as_secs().max(1)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let prefixed_pattern = self.prefix_key(pattern);
        let mut conn = self.connection.clone();

        // SCAN rather than KEYS to avoid blocking the server
        let mut cursor = 0u64;
        let mut total_deleted = 0usize;

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&prefixed_pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!(
                        "Failed to scan keys with pattern '{}': {}",
                        pattern, e
                    ))
                })?;

            if !keys.is_empty() {
                let deleted: usize = conn.del(&keys).await.map_err(|e| {
                    DomainError::cache(format!("Failed to delete keys: {}", e))
                })?;
                total_deleted += deleted;
            }

            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(total_deleted)
    }
}

#[async_trait]
impl ResultCache for RedisResultCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();

        conn.get(self.prefix_key(key))
            .await
            .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))
    }

    async fn set(&self, key: &str, value: &str, tags: &BTreeSet<String>) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();
        let ttl_secs = self.ttl_secs();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(self.prefix_key(key))
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .ignore();

        for tag in tags {
            let tag_key = self.tag_key(tag);
            pipe.cmd("SADD").arg(&tag_key).arg(key).ignore();
            pipe.cmd("EXPIRE").arg(&tag_key).arg(ttl_secs).ignore();
        }

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))
    }

    async fn invalidate_tags(&self, tags: &[String]) -> Result<usize, DomainError> {
        let mut conn = self.connection.clone();
        let mut removed = 0usize;

        for tag in tags {
            let tag_key = self.tag_key(tag);

            let keys: Vec<String> = conn.smembers(&tag_key).await.map_err(|e| {
                DomainError::cache(format!("Failed to read tag '{}': {}", tag, e))
            })?;

            if !keys.is_empty() {
                let prefixed: Vec<String> = keys.iter().map(|k| self.prefix_key(k)).collect();
                let deleted: usize = conn.del(&prefixed).await.map_err(|e| {
                    DomainError::cache(format!("Failed to delete keys for tag '{}': {}", tag, e))
                })?;
                removed += deleted;
            }

            let _: () = conn.del(&tag_key).await.map_err(|e| {
                DomainError::cache(format!("Failed to delete tag '{}': {}", tag, e))
            })?;
        }

        Ok(removed)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.delete_pattern(&format!("{}*", crate::domain::cache::RESPONSE_KEY_PREFIX))
            .await?;
        self.delete_pattern(&format!("{}*", TAG_NAMESPACE)).await?;
        Ok(())
    }
}
