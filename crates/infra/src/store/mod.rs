//! Storage traits for the RBAC triad.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dashbore_core::{Permission, Role, User, UserWithRoles};

pub mod in_memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("unsupported sort field: {0}")]
    InvalidSortField(String),
}

/// Sort direction for listings. Only `asc`/`desc` are valid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One field/direction pair; listings sort by these in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Parameters for a paginated user listing.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub offset: i64,
    pub limit: i64,
    pub sort: Vec<SortKey>,
    /// Case-insensitive substring match on email and name.
    pub search: Option<String>,
}

/// Persistent permission rows. Upserts are keyed by the unique name, so
/// re-running initialization never duplicates rows.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn upsert_permission(&self, permission: &Permission) -> Result<Permission, StoreError>;

    /// All permission rows currently persisted — not just the core set.
    async fn all_permissions(&self) -> Result<Vec<Permission>, StoreError>;

    async fn find_permission_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError>;
}

/// Persistent users, roles, and their join rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fetch a user with the roles→permissions graph eager-loaded.
    async fn find_user_with_roles(&self, id: i64) -> Result<Option<UserWithRoles>, StoreError>;

    /// Page of users plus the total matching count.
    async fn list_users(&self, query: &ListQuery) -> Result<(Vec<User>, i64), StoreError>;

    /// Create a user, or return the existing row on email conflict.
    async fn upsert_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    async fn upsert_role(&self, name: &str) -> Result<Role, StoreError>;

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError>;

    async fn grant_role_permission(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<(), StoreError>;

    async fn assign_user_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError>;
}

/// Blanket alias for backends that implement both halves.
pub trait Store: UserStore + PermissionStore {}

impl<T: UserStore + PermissionStore> Store for T {}
