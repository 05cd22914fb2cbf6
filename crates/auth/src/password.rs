//! Password hashing/verification (argon2, PHC string format).

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("unable to hash password: {0}")]
    Hash(String),
}

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(phc.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// An unparseable stored hash verifies as `false` rather than erroring; a
/// corrupt row must not read as a valid credential.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("dashbore").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "dashbore"));
        assert!(!verify_password(&hash, "not-dashbore"));
    }

    #[test]
    fn corrupt_hash_never_verifies() {
        assert!(!verify_password("garbage", "anything"));
        assert!(!verify_password("", "anything"));
    }
}
