//! JWT claims model (transport-agnostic).

use serde::{Deserialize, Serialize};

/// Claims carried inside a bearer token.
///
/// This is the minimal identity the API embeds at login: the user's id and
/// email, `sub` mirroring the id, plus the standard time claims. Tokens are
/// stateless — nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    pub id: i64,

    /// User email at issue time.
    pub email: String,

    /// Subject — the user id rendered as a string.
    pub sub: String,

    /// Issued-at, seconds since epoch.
    pub iat: i64,

    /// Expiration, seconds since epoch. Enforced by the verifier.
    pub exp: i64,
}
