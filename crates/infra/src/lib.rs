//! `dashbore-infra` — storage and cache backends.
//!
//! Stores come in pairs behind traits: a Postgres implementation for
//! production and an in-memory implementation for tests and credential-less
//! dev runs. The cache follows the same pattern (Redis / in-memory).

pub mod bootstrap;
pub mod cache;
pub mod seed;
pub mod store;

pub use bootstrap::bootstrap;
pub use cache::{build_key, CacheBackend, CacheError, QueryCache};
pub use cache::in_memory::InMemoryCacheBackend;
pub use cache::redis::RedisCacheBackend;
pub use seed::seed;
pub use store::{
    in_memory::InMemoryStore, postgres::PostgresStore, ListQuery, PermissionStore, SortDirection,
    SortKey, Store, StoreError, UserStore,
};
