//! In-memory store (tests and credential-less dev runs).

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use dashbore_core::{Permission, Role, RoleGrant, User, UserWithRoles};

use super::{ListQuery, PermissionStore, SortDirection, SortKey, StoreError, UserStore};

/// All tables behind one mutex. Good enough for tests; the Postgres store
/// is the production path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    users: Vec<User>,
    role_permissions: HashSet<(i64, i64)>,
    user_roles: HashSet<(i64, i64)>,
    next_role_id: i64,
    next_user_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_users(a: &User, b: &User, sort: &[SortKey]) -> Result<Ordering, StoreError> {
    for key in sort {
        let ord = match key.field.as_str() {
            "id" => a.id.cmp(&b.id),
            "email" => a.email.cmp(&b.email),
            "name" => a.name.cmp(&b.name),
            "createdAt" => a.created_at.cmp(&b.created_at),
            "updatedAt" => a.updated_at.cmp(&b.updated_at),
            other => return Err(StoreError::InvalidSortField(other.to_string())),
        };
        let ord = match key.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(Ordering::Equal)
}

#[async_trait]
impl PermissionStore for InMemoryStore {
    async fn upsert_permission(&self, permission: &Permission) -> Result<Permission, StoreError> {
        let mut tables = self.inner.lock().expect("store lock poisoned");
        match tables
            .permissions
            .iter_mut()
            .find(|p| p.name == permission.name)
        {
            Some(existing) => {
                existing.description = permission.description.clone();
                Ok(existing.clone())
            }
            None => {
                tables.permissions.push(permission.clone());
                Ok(permission.clone())
            }
        }
    }

    async fn all_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        Ok(self.inner.lock().expect("store lock poisoned").permissions.clone())
    }

    async fn find_permission_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("store lock poisoned")
            .permissions
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("store lock poisoned")
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_with_roles(&self, id: i64) -> Result<Option<UserWithRoles>, StoreError> {
        let tables = self.inner.lock().expect("store lock poisoned");
        let Some(user) = tables.users.iter().find(|u| u.id == id).cloned() else {
            return Ok(None);
        };

        let role_perms: HashMap<i64, Vec<Permission>> = tables
            .roles
            .iter()
            .map(|role| {
                let perms = tables
                    .permissions
                    .iter()
                    .filter(|p| tables.role_permissions.contains(&(role.id, p.id)))
                    .cloned()
                    .collect();
                (role.id, perms)
            })
            .collect();

        let roles = tables
            .roles
            .iter()
            .filter(|role| tables.user_roles.contains(&(user.id, role.id)))
            .map(|role| RoleGrant {
                role: role.clone(),
                permissions: role_perms.get(&role.id).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(Some(UserWithRoles { user, roles }))
    }

    async fn list_users(&self, query: &ListQuery) -> Result<(Vec<User>, i64), StoreError> {
        let tables = self.inner.lock().expect("store lock poisoned");

        let mut matched: Vec<User> = tables
            .users
            .iter()
            .filter(|u| match &query.search {
                Some(needle) => {
                    let needle = needle.to_lowercase();
                    u.email.to_lowercase().contains(&needle)
                        || u.name
                            .as_deref()
                            .is_some_and(|n| n.to_lowercase().contains(&needle))
                }
                None => true,
            })
            .cloned()
            .collect();

        // Validate sort fields up front so an error surfaces even on an
        // empty match set.
        for key in &query.sort {
            if !matches!(
                key.field.as_str(),
                "id" | "email" | "name" | "createdAt" | "updatedAt"
            ) {
                return Err(StoreError::InvalidSortField(key.field.clone()));
            }
        }
        matched.sort_by(|a, b| compare_users(a, b, &query.sort).unwrap_or(Ordering::Equal));

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn upsert_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut tables = self.inner.lock().expect("store lock poisoned");
        if let Some(existing) = tables.users.iter().find(|u| u.email == email) {
            return Ok(existing.clone());
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            email: email.to_string(),
            name: name.map(str::to_string),
            password: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn upsert_role(&self, name: &str) -> Result<Role, StoreError> {
        let mut tables = self.inner.lock().expect("store lock poisoned");
        if let Some(existing) = tables.roles.iter().find(|r| r.name == name) {
            return Ok(existing.clone());
        }

        tables.next_role_id += 1;
        let role = Role {
            id: tables.next_role_id,
            name: name.to_string(),
        };
        tables.roles.push(role.clone());
        Ok(role)
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("store lock poisoned")
            .roles
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn grant_role_permission(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<(), StoreError> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .role_permissions
            .insert((role_id, permission_id));
        Ok(())
    }

    async fn assign_user_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .user_roles
            .insert((user_id, role_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upserts_are_idempotent_on_unique_keys() {
        let store = InMemoryStore::new();

        let first = store.upsert_user("a@test.com", None, "hash").await.unwrap();
        let second = store.upsert_user("a@test.com", None, "other").await.unwrap();
        assert_eq!(first.id, second.id);
        // Existing row wins; the second upsert does not rewrite it.
        assert_eq!(second.password, "hash");

        let r1 = store.upsert_role("Admin").await.unwrap();
        let r2 = store.upsert_role("Admin").await.unwrap();
        assert_eq!(r1.id, r2.id);
    }

    #[tokio::test]
    async fn list_users_paginates_sorts_and_searches() {
        let store = InMemoryStore::new();
        for (email, name) in [
            ("carol@test.com", Some("Carol")),
            ("alice@test.com", Some("Alice")),
            ("bob@test.com", None),
        ] {
            store.upsert_user(email, name, "hash").await.unwrap();
        }

        let query = ListQuery {
            offset: 0,
            limit: 2,
            sort: vec![SortKey::new("email", SortDirection::Asc)],
            search: None,
        };
        let (page, total) = store.list_users(&query).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].email, "alice@test.com");

        let query = ListQuery {
            offset: 0,
            limit: 10,
            sort: vec![SortKey::new("id", SortDirection::Desc)],
            search: Some("BOB".to_string()),
        };
        let (page, total) = store.list_users(&query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].email, "bob@test.com");
    }

    #[tokio::test]
    async fn unknown_sort_field_is_rejected() {
        let store = InMemoryStore::new();
        store.upsert_user("a@test.com", None, "hash").await.unwrap();

        let query = ListQuery {
            offset: 0,
            limit: 10,
            sort: vec![SortKey::new("password", SortDirection::Asc)],
            search: None,
        };
        let err = store.list_users(&query).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidSortField(f) if f == "password"));
    }

    #[tokio::test]
    async fn roles_and_permissions_resolve_through_joins() {
        let store = InMemoryStore::new();
        let wildcard = Permission {
            id: 1,
            name: "*".to_string(),
            description: "All permissions".to_string(),
        };
        store.upsert_permission(&wildcard).await.unwrap();

        let role = store.upsert_role("Admin").await.unwrap();
        store.grant_role_permission(role.id, 1).await.unwrap();

        let user = store.upsert_user("a@test.com", None, "hash").await.unwrap();
        store.assign_user_role(user.id, role.id).await.unwrap();

        let graph = store.find_user_with_roles(user.id).await.unwrap().unwrap();
        assert_eq!(graph.roles.len(), 1);
        assert_eq!(graph.roles[0].role.name, "Admin");
        assert_eq!(graph.roles[0].permissions[0].name, "*");

        assert!(store.find_user_with_roles(9999).await.unwrap().is_none());
    }
}
