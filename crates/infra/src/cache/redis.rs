//! Redis cache backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use super::{CacheBackend, CacheError};

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

/// Redis-backed cache over one multiplexed connection (cheap to clone,
/// shared across requests).
#[derive(Clone)]
pub struct RedisCacheBackend {
    conn: MultiplexedConnection,
}

impl RedisCacheBackend {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // Sub-second TTLs round up so an entry never lives forever.
        let secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, secs).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists(key).await?)
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        Ok(conn.del(keys.to_vec()).await?)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.keys(format!("{prefix}*")).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Requires a live Redis.
    #[tokio::test]
    #[ignore]
    async fn round_trips_against_live_redis() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        let backend = RedisCacheBackend::connect(&url).await.unwrap();

        backend
            .set("dashbore-test:key", "value", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(
            backend.get("dashbore-test:key").await.unwrap().as_deref(),
            Some("value")
        );
        assert!(backend.exists("dashbore-test:key").await.unwrap());

        let removed = backend
            .delete(&["dashbore-test:key".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
