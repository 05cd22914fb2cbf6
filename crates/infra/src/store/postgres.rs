//! Postgres-backed store (sqlx).
//!
//! Every write is a single-row upsert on the table's unique key, so
//! initialization and seeding can re-run without duplicating rows. Sort
//! fields are mapped through a fixed column whitelist before they reach the
//! ORDER BY clause.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use dashbore_core::{Permission, Role, RoleGrant, User, UserWithRoles};

use super::{ListQuery, PermissionStore, StoreError, UserStore};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        password: row.try_get("password")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn permission_from_row(row: &PgRow) -> Result<Permission, sqlx::Error> {
    Ok(Permission {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

/// Map a wire-level sort field to its column. Unknown fields are rejected
/// rather than interpolated.
fn sort_column(field: &str) -> Result<&'static str, StoreError> {
    match field {
        "id" => Ok("id"),
        "email" => Ok("email"),
        "name" => Ok("name"),
        "createdAt" => Ok("created_at"),
        "updatedAt" => Ok("updated_at"),
        other => Err(StoreError::InvalidSortField(other.to_string())),
    }
}

fn order_by_clause(query: &ListQuery) -> Result<String, StoreError> {
    let mut keys = Vec::with_capacity(query.sort.len());
    for key in &query.sort {
        keys.push(format!("{} {}", sort_column(&key.field)?, key.direction.as_sql()));
    }
    Ok(keys.join(", "))
}

const USER_COLUMNS: &str = "id, email, name, password, created_at, updated_at";

#[async_trait]
impl PermissionStore for PostgresStore {
    async fn upsert_permission(&self, permission: &Permission) -> Result<Permission, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO permissions (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
            RETURNING id, name, description
            "#,
        )
        .bind(permission.id)
        .bind(&permission.name)
        .bind(&permission.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(permission_from_row(&row)?)
    }

    async fn all_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        let rows = sqlx::query("SELECT id, name, description FROM permissions ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| permission_from_row(row).map_err(StoreError::from))
            .collect()
    }

    async fn find_permission_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError> {
        let row = sqlx::query("SELECT id, name, description FROM permissions WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| permission_from_row(&r).map_err(StoreError::from))
            .transpose()
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| user_from_row(&r).map_err(StoreError::from))
            .transpose()
    }

    async fn find_user_with_roles(&self, id: i64) -> Result<Option<UserWithRoles>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let user = user_from_row(&row)?;

        let role_rows = sqlx::query(
            r#"
            SELECT r.id, r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;

        let mut roles = Vec::with_capacity(role_rows.len());
        for role_row in role_rows {
            let role = Role {
                id: role_row.try_get("id").map_err(StoreError::from)?,
                name: role_row.try_get("name").map_err(StoreError::from)?,
            };

            let perm_rows = sqlx::query(
                r#"
                SELECT p.id, p.name, p.description
                FROM permissions p
                JOIN role_permissions rp ON rp.permission_id = p.id
                WHERE rp.role_id = $1
                ORDER BY p.id
                "#,
            )
            .bind(role.id)
            .fetch_all(&self.pool)
            .await?;

            let permissions = perm_rows
                .iter()
                .map(|r| permission_from_row(r).map_err(StoreError::from))
                .collect::<Result<Vec<_>, _>>()?;

            roles.push(RoleGrant { role, permissions });
        }

        Ok(Some(UserWithRoles { user, roles }))
    }

    async fn list_users(&self, query: &ListQuery) -> Result<(Vec<User>, i64), StoreError> {
        let order_by = match order_by_clause(query)? {
            clause if clause.is_empty() => String::new(),
            clause => format!("ORDER BY {clause}"),
        };
        let where_clause = if query.search.is_some() {
            "WHERE email ILIKE $3 OR name ILIKE $3"
        } else {
            ""
        };
        let pattern = query.search.as_ref().map(|s| format!("%{s}%"));

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users {where_clause} {order_by} OFFSET $1 LIMIT $2"
        );
        let mut select = sqlx::query(&sql).bind(query.offset).bind(query.limit);
        if let Some(pattern) = &pattern {
            select = select.bind(pattern);
        }
        let rows = select.fetch_all(&self.pool).await?;
        let users = rows
            .iter()
            .map(|row| user_from_row(row).map_err(StoreError::from))
            .collect::<Result<Vec<_>, _>>()?;

        let count_sql = if query.search.is_some() {
            "SELECT COUNT(*) AS total FROM users WHERE email ILIKE $1 OR name ILIKE $1"
        } else {
            "SELECT COUNT(*) AS total FROM users"
        };
        let mut count = sqlx::query(count_sql);
        if let Some(pattern) = &pattern {
            count = count.bind(pattern);
        }
        let total: i64 = count.fetch_one(&self.pool).await?.try_get("total")?;

        Ok((users, total))
    }

    async fn upsert_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        // No-op update on conflict: the existing row wins, matching the
        // seed semantics.
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, name, password, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row)?)
    }

    async fn upsert_role(&self, name: &str) -> Result<Role, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Role {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(Role {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            }),
            None => None,
        })
    }

    async fn grant_role_permission(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn assign_user_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ListQuery, SortDirection, SortKey};

    #[test]
    fn order_by_rejects_unknown_fields() {
        let query = ListQuery {
            offset: 0,
            limit: 10,
            sort: vec![SortKey::new("password", SortDirection::Asc)],
            search: None,
        };
        assert!(matches!(
            order_by_clause(&query),
            Err(StoreError::InvalidSortField(f)) if f == "password"
        ));
    }

    #[test]
    fn order_by_maps_camel_case_fields() {
        let query = ListQuery {
            offset: 0,
            limit: 10,
            sort: vec![
                SortKey::new("id", SortDirection::Desc),
                SortKey::new("createdAt", SortDirection::Desc),
            ],
            search: None,
        };
        assert_eq!(order_by_clause(&query).unwrap(), "id DESC, created_at DESC");
    }

    // Requires a live Postgres with the dashbore schema applied.
    #[tokio::test]
    #[ignore]
    async fn round_trips_against_live_database() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let store = PostgresStore::connect(&url).await.unwrap();

        let perm = Permission {
            id: 1,
            name: "*".to_string(),
            description: "All permissions".to_string(),
        };
        store.upsert_permission(&perm).await.unwrap();
        store.upsert_permission(&perm).await.unwrap();

        let all = store.all_permissions().await.unwrap();
        assert_eq!(all.iter().filter(|p| p.name == "*").count(), 1);
    }
}
