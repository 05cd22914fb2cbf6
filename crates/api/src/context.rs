//! Request identity context.

use serde_json::Value;

use dashbore_auth::TokenClaims;
use dashbore_core::NormalizedUser;

/// The caller's identity, attached to request extensions by the auth
/// middleware. Downstream handlers read identity exclusively from here and
/// never re-derive it.
///
/// `Light` trusts the token claims without a database round-trip; `Full`
/// carries the user with flattened roles and permissions.
#[derive(Debug, Clone)]
pub enum Identity {
    Light(TokenClaims),
    Full(NormalizedUser),
}

impl Identity {
    pub fn user_id(&self) -> i64 {
        match self {
            Identity::Light(claims) => claims.id,
            Identity::Full(user) => user.user.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Identity::Light(claims) => &claims.email,
            Identity::Full(user) => &user.user.email,
        }
    }

    /// JSON view of whichever identity shape is attached.
    pub fn to_json(&self) -> Value {
        match self {
            Identity::Light(claims) => serde_json::json!(claims),
            Identity::Full(user) => serde_json::json!(user),
        }
    }
}
