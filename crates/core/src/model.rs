//! Permission / role / user model.
//!
//! These are the persisted shapes of the RBAC triad plus the request-scoped
//! `NormalizedUser` view used by authorization checks. Serialization here is
//! the wire contract: `camelCase` field names, password never emitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An atomic named capability, e.g. `users:read`.
///
/// The wildcard permission `*` satisfies every check. Identity is the unique
/// `name`; rows are written via upsert keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// A named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// A stored user row.
///
/// The `password` field holds the PHC-format hash and is never serialized
/// to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A role assigned to a user, with the role's permissions eager-loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// A user with the full roles→permissions graph attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: Vec<RoleGrant>,
}

/// A user augmented with flattened role and permission names.
///
/// Computed on demand, never persisted. The permission list may contain
/// duplicates when several roles grant the same permission; checks use set
/// membership so duplicates are harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedUser {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

/// Flatten a user's role/permission graph into name lists.
pub fn normalize_user(user: UserWithRoles) -> NormalizedUser {
    let roles = user.roles.iter().map(|g| g.role.name.clone()).collect();
    let permissions = user
        .roles
        .iter()
        .flat_map(|g| g.permissions.iter().map(|p| p.name.clone()))
        .collect();

    NormalizedUser {
        user: user.user,
        roles,
        permissions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "dashbore@test.com".to_string(),
            name: Some("Dashbore Admin".to_string()),
            password: "$argon2id$...".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn normalize_flattens_roles_and_permissions() {
        let read = Permission {
            id: 2,
            name: "users:read".to_string(),
            description: "Read users".to_string(),
        };
        let write = Permission {
            id: 3,
            name: "users:write".to_string(),
            description: "Write users".to_string(),
        };

        let graph = UserWithRoles {
            user: sample_user(),
            roles: vec![
                RoleGrant {
                    role: Role {
                        id: 1,
                        name: "Admin".to_string(),
                    },
                    permissions: vec![read.clone(), write],
                },
                RoleGrant {
                    role: Role {
                        id: 2,
                        name: "Auditor".to_string(),
                    },
                    // Overlapping grant on purpose; duplicates are tolerated.
                    permissions: vec![read],
                },
            ],
        };

        let normalized = normalize_user(graph);
        assert_eq!(normalized.roles, vec!["Admin", "Auditor"]);
        assert_eq!(
            normalized.permissions,
            vec!["users:read", "users:write", "users:read"]
        );
    }

    #[test]
    fn password_is_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "dashbore@test.com");
        assert!(json.get("createdAt").is_some());
    }
}
