//! `dashbore-core` — domain foundation for the admin API.
//!
//! This crate contains **pure domain** types (no storage or HTTP concerns):
//! the permission/role/user model and its normalization helpers.

pub mod model;

pub use model::{
    normalize_user, NormalizedUser, Permission, Role, RoleGrant, User, UserWithRoles,
};
