//! Core permission catalog and the pure permission check.

use std::collections::HashSet;

use dashbore_core::Permission;

/// The wildcard permission name. Grants every capability.
pub const WILDCARD: &str = "*";

/// The fixed set of core permissions the bootstrapper guarantees to exist.
///
/// Ids are stable; the upsert is keyed by the unique name, so re-running
/// bootstrap never duplicates rows.
pub fn core_permissions() -> Vec<Permission> {
    vec![
        Permission {
            id: 1,
            name: WILDCARD.to_string(),
            description: "All permissions".to_string(),
        },
        Permission {
            id: 2,
            name: "users:read".to_string(),
            description: "Read users".to_string(),
        },
        Permission {
            id: 3,
            name: "users:write".to_string(),
            description: "Write users".to_string(),
        },
        Permission {
            id: 4,
            name: "users:delete".to_string(),
            description: "Delete users".to_string(),
        },
    ]
}

/// Check whether a granted permission set satisfies a requirement list.
///
/// The wildcard grants everything; otherwise at least one of `required`
/// must be granted (logical OR, not AND). Pure policy check — no IO.
pub fn check_permissions(granted: &[String], required: &[String]) -> bool {
    let granted: HashSet<&str> = granted.iter().map(String::as_str).collect();

    if granted.contains(WILDCARD) {
        return true;
    }

    required.iter().any(|p| granted.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn wildcard_satisfies_everything() {
        let granted = names(&["*"]);
        assert!(check_permissions(&granted, &names(&["users:read"])));
        assert!(check_permissions(&granted, &names(&["anything:else"])));
    }

    #[test]
    fn any_required_permission_suffices() {
        let granted = names(&["users:read"]);
        assert!(check_permissions(
            &granted,
            &names(&["users:write", "users:read"])
        ));
        assert!(!check_permissions(&granted, &names(&["users:write"])));
    }

    #[test]
    fn duplicates_in_granted_set_are_harmless() {
        let granted = names(&["users:read", "users:read"]);
        assert!(check_permissions(&granted, &names(&["users:read"])));
    }

    #[test]
    fn empty_grant_denies() {
        assert!(!check_permissions(&[], &names(&["users:read"])));
    }

    #[test]
    fn catalog_is_stable() {
        let core = core_permissions();
        assert_eq!(core.len(), 4);
        assert_eq!(core[0].name, "*");
        assert_eq!(core[0].id, 1);
        assert_eq!(core[1].name, "users:read");
    }
}
