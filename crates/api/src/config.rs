//! Environment configuration, read once at startup.

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Everything the process reads from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `JWT_SECRET` — token signing secret.
    pub jwt_secret: String,
    /// `JWT_EXPIRATION_SECS` — token lifetime (default 3600).
    pub jwt_lifetime: Duration,
    /// `DATABASE_URL` — Postgres connection string; in-memory store when unset.
    pub database_url: Option<String>,
    /// `REDIS_URL` — cache connection string; in-memory cache when unset.
    pub redis_url: Option<String>,
    /// `REDIS_DEFAULT_TTL_SECS` — default cache TTL (default 30).
    pub default_cache_ttl: StdDuration,
    /// `APP_ENV` — `production` suppresses non-production seed data.
    pub production: bool,
    /// `BIND_ADDR` — listen address (default `0.0.0.0:8080`).
    pub bind_addr: String,
    /// `CORS_ORIGIN` — allowed browser origin (default dev UI).
    pub cors_origin: String,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = env_var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let jwt_lifetime = env_var("JWT_EXPIRATION_SECS")
            .and_then(|v| v.parse::<i64>().ok())
            .map(Duration::seconds)
            .unwrap_or_else(|| Duration::seconds(3600));

        let default_cache_ttl = env_var("REDIS_DEFAULT_TTL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(StdDuration::from_secs)
            .unwrap_or_else(|| StdDuration::from_secs(30));

        Self {
            jwt_secret,
            jwt_lifetime,
            database_url: env_var("DATABASE_URL"),
            redis_url: env_var("REDIS_URL"),
            default_cache_ttl,
            production: env_var("APP_ENV").as_deref() == Some("production"),
            bind_addr: env_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            cors_origin: env_var("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
        }
    }

    /// Config for tests: in-memory backends, short-lived tokens.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            jwt_lifetime: Duration::minutes(10),
            database_url: None,
            redis_url: None,
            default_cache_ttl: StdDuration::from_secs(30),
            production: false,
            bind_addr: "127.0.0.1:0".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}
