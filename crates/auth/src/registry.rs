//! In-process permission registry.

use std::collections::HashMap;
use std::sync::RwLock;

use dashbore_core::Permission;

/// The in-memory mapping from permission name to permission record — the
/// single source of truth consulted during authorization checks.
///
/// Constructed once at startup and shared by handle; tests get isolation by
/// creating fresh instances. Entries keep first-insertion order;
/// re-registering a name overwrites the record in place (last write wins).
/// Registering here does not, by itself, persist anything.
#[derive(Debug, Default)]
pub struct PermissionRegistry {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    index: HashMap<String, usize>,
    entries: Vec<Permission>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry keyed by name. Idempotent.
    pub fn register(&self, permission: Permission) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        match inner.index.get(&permission.name) {
            Some(&pos) => inner.entries[pos] = permission,
            None => {
                let pos = inner.entries.len();
                inner.index.insert(permission.name.clone(), pos);
                inner.entries.push(permission);
            }
        }
    }

    /// Bulk-insert, overwriting any existing same-named entries.
    pub fn load(&self, permissions: Vec<Permission>) {
        for permission in permissions {
            self.register(permission);
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner
            .read()
            .expect("registry lock poisoned")
            .index
            .contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Permission> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner.index.get(name).map(|&pos| inner.entries[pos].clone())
    }

    /// Current contents in insertion order.
    pub fn all(&self) -> Vec<Permission> {
        self.inner
            .read()
            .expect("registry lock poisoned")
            .entries
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("registry lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(id: i64, name: &str) -> Permission {
        Permission {
            id,
            name: name.to_string(),
            description: format!("{name} permission"),
        }
    }

    #[test]
    fn load_makes_entries_visible() {
        let registry = PermissionRegistry::new();
        registry.load(vec![perm(1, "*"), perm(2, "users:read")]);

        assert!(registry.has("*"));
        assert!(registry.has("users:read"));
        assert_eq!(registry.get("users:read").unwrap().id, 2);
        assert!(registry.get("users:write").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_load_leaves_prior_entries_untouched() {
        let registry = PermissionRegistry::new();
        registry.register(perm(1, "*"));
        registry.load(Vec::new());

        assert_eq!(registry.len(), 1);
        assert!(registry.has("*"));
    }

    #[test]
    fn register_overwrites_in_place() {
        let registry = PermissionRegistry::new();
        registry.register(perm(2, "users:read"));
        registry.register(perm(5, "users:read"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("users:read").unwrap().id, 5);
    }

    #[test]
    fn all_preserves_insertion_order_across_overwrites() {
        let registry = PermissionRegistry::new();
        registry.load(vec![perm(1, "*"), perm(2, "users:read"), perm(3, "users:write")]);
        // Overwriting an early name must not move it to the back.
        registry.register(perm(9, "*"));

        let names: Vec<String> = registry.all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["*", "users:read", "users:write"]);
        assert_eq!(registry.get("*").unwrap().id, 9);
    }
}
