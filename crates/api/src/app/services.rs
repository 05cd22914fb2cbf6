//! Service wiring: the store, cache, permission registry, and token service
//! shared by all handlers.

use std::sync::Arc;

use dashbore_auth::{verify_password, PermissionRegistry, TokenService};
use dashbore_core::{normalize_user, NormalizedUser, User};
use dashbore_infra::{
    InMemoryCacheBackend, InMemoryStore, PostgresStore, QueryCache, RedisCacheBackend, Store,
    UserStore,
};

use crate::config::AppConfig;

use super::errors::ApiError;

/// Process-wide services, built once at startup and shared by `Arc`.
pub struct AppServices {
    pub store: Arc<dyn Store>,
    pub cache: QueryCache,
    pub registry: Arc<PermissionRegistry>,
    pub tokens: TokenService,
}

impl AppServices {
    /// Wire against Postgres and Redis when configured; fall back to the
    /// in-memory backends (with a warning) so dev runs work without
    /// credentials.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => Arc::new(PostgresStore::connect(url).await?),
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store");
                Arc::new(InMemoryStore::new())
            }
        };

        let cache = match &config.redis_url {
            Some(url) => QueryCache::new(
                Arc::new(RedisCacheBackend::connect(url).await?),
                config.default_cache_ttl,
            ),
            None => {
                tracing::warn!("REDIS_URL not set; using in-memory cache");
                QueryCache::new(Arc::new(InMemoryCacheBackend::new()), config.default_cache_ttl)
            }
        };

        Ok(Self::assemble(config, store, cache))
    }

    /// Fully in-memory services (tests).
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::assemble(
            config,
            Arc::new(InMemoryStore::new()),
            QueryCache::new(Arc::new(InMemoryCacheBackend::new()), config.default_cache_ttl),
        )
    }

    fn assemble(config: &AppConfig, store: Arc<dyn Store>, cache: QueryCache) -> Self {
        Self {
            store,
            cache,
            registry: Arc::new(PermissionRegistry::new()),
            tokens: TokenService::new(&config.jwt_secret, config.jwt_lifetime),
        }
    }

    /// Validate an email/password pair and return the full user record.
    ///
    /// The returned record still carries the hash; callers must not leak it
    /// further. No lockout or rate limiting here (known gap, preserved).
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            return Err(ApiError::unauthorized("Invalid credentials"));
        };

        if !verify_password(&user.password, password) {
            return Err(ApiError::unauthorized("Invalid password"));
        }

        Ok(user)
    }

    /// Fetch a user with flattened roles/permissions, the password field
    /// cleared out of the result.
    pub async fn fetch_full_user(&self, id: i64) -> Result<Option<NormalizedUser>, ApiError> {
        let Some(graph) = self.store.find_user_with_roles(id).await? else {
            return Ok(None);
        };

        let mut normalized = normalize_user(graph);
        normalized.user.password = String::new();
        Ok(Some(normalized))
    }
}
