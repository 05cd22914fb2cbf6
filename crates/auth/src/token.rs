//! Bearer token issue/verify (HS512).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use dashbore_core::User;

use crate::claims::TokenClaims;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("unable to sign token: {0}")]
    Sign(String),

    /// Signature mismatch, malformed token, or expiry. The underlying
    /// library message is kept as diagnostic detail.
    #[error("unable to verify token. The token is invalid or expired. {0}")]
    Invalid(String),
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// Holds the server secret and the configured token lifetime. There is no
/// refresh mechanism; tokens expire absolutely.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Issue a token for `user` with `{id, email}` claims and `sub = id`.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            id: user.id,
            email: user.email.clone(),
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)
            .map_err(|e| TokenError::Sign(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// Expiry is enforced here; any decode failure maps to
    /// [`TokenError::Invalid`] with the library's message attached.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS512);
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dashbore_core::User;

    fn user() -> User {
        User {
            id: 42,
            email: "dashbore@test.com".to_string(),
            name: None,
            password: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_verifies_and_carries_identity() {
        let svc = TokenService::new("test-secret", Duration::minutes(10));
        let token = svc.issue(&user()).unwrap();
        assert!(!token.is_empty());

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "dashbore@test.com");
        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let svc = TokenService::new("test-secret", Duration::minutes(10));
        let token = svc.issue(&user()).unwrap();

        let other = TokenService::new("other-secret", Duration::minutes(10));
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative lifetime puts exp in the past; leeway defaults make us
        // back-date well beyond the 60s default.
        let svc = TokenService::new("test-secret", Duration::minutes(-10));
        let token = svc.issue(&user()).unwrap();
        let err = svc.verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = TokenService::new("test-secret", Duration::minutes(10));
        assert!(svc.verify("not-a-token").is_err());
    }
}
