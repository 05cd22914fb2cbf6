//! `dashbore-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it holds the
//! token claims model and HS512 signer/verifier, password hashing, the
//! in-memory permission registry, and the pure permission check.

pub mod claims;
pub mod password;
pub mod permissions;
pub mod registry;
pub mod token;

pub use claims::TokenClaims;
pub use password::{hash_password, verify_password, PasswordError};
pub use permissions::{check_permissions, core_permissions, WILDCARD};
pub use registry::PermissionRegistry;
pub use token::{TokenError, TokenService};
