//! In-memory cache backend (tests and credential-less dev runs).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{CacheBackend, CacheError};

/// String map with per-entry expiry. Expired entries are evicted lazily on
/// access.
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let mut removed = 0;
        for key in keys {
            if entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .expect("cache lock poisoned")
            .iter()
            .filter(|(key, (_, expires_at))| key.starts_with(prefix) && *expires_at > now)
            .map(|(key, _)| key.clone())
            .collect())
    }
}
