//! TTL cache used to memoize read-heavy queries.
//!
//! Keys are canonical strings derived from a namespace and a sorted
//! parameter list, so the same logical query always maps to the same key
//! regardless of parameter order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub mod in_memory;
pub mod redis;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialize(err.to_string())
    }
}

/// Raw string-keyed TTL storage. Implemented by Redis and by the in-memory
/// test backend.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError>;

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError>;
}

/// Build the canonical cache key: `{namespace}:{k=v}:{k=v}` with entries
/// sorted, so insertion order of the parameters never changes the key.
pub fn build_key(namespace: &str, params: &[(String, String)]) -> String {
    let mut entries: Vec<&(String, String)> = params.iter().collect();
    entries.sort();
    let query: Vec<String> = entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{namespace}:{}", query.join(":"))
}

/// Namespaced query cache with a configurable default TTL.
#[derive(Clone)]
pub struct QueryCache {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Duration,
}

impl QueryCache {
    pub fn new(backend: Arc<dyn CacheBackend>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    /// Return the cached value for this key if present; otherwise store
    /// `value` with a TTL and return it.
    ///
    /// The caller computes `value` before calling, so a miss pays the full
    /// upstream cost; only callers within the TTL window are saved. There
    /// is no single-flight guard: concurrent misses may both write and the
    /// last writer wins, which is harmless because values are re-derivations
    /// of the same query.
    pub async fn get_or_set<T>(
        &self,
        namespace: &str,
        params: &[(String, String)],
        value: T,
        ttl: Option<Duration>,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = build_key(namespace, params);

        if let Some(raw) = self.backend.get(&key).await? {
            tracing::info!(%key, "cache hit");
            return Ok(serde_json::from_str(&raw)?);
        }

        tracing::info!(%key, "cache set");
        let raw = serde_json::to_string(&value)?;
        self.backend
            .set(&key, &raw, ttl.unwrap_or(self.default_ttl))
            .await?;
        Ok(value)
    }

    pub async fn has(&self, namespace: &str, params: &[(String, String)]) -> Result<bool, CacheError> {
        self.backend.exists(&build_key(namespace, params)).await
    }

    /// Remove exactly one key, or — when `params` is `None` — every key
    /// under the namespace. Returns the number of removed entries.
    pub async fn invalidate(
        &self,
        namespace: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<u64, CacheError> {
        match params {
            Some(params) => {
                let key = build_key(namespace, params);
                self.backend.delete(std::slice::from_ref(&key)).await
            }
            None => {
                let keys = self
                    .backend
                    .keys_with_prefix(&format!("{namespace}:"))
                    .await?;
                if keys.is_empty() {
                    return Ok(0);
                }
                self.backend.delete(&keys).await
            }
        }
    }
}
