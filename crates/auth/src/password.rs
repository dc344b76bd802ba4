//! Password hashing and verification (Argon2id, salted, memory-hard).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The underlying hasher failed (or the input was empty).
    #[error("password hashing failed")]
    HashFailure,
}

/// Hash a plaintext secret. The salt is generated per call and embedded in
/// the PHC-format output string.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    if plaintext.is_empty() {
        return Err(PasswordError::HashFailure);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "argon2 hashing failed");
            PasswordError::HashFailure
        })?;

    Ok(hash.to_string())
}

/// Verify a plaintext against a stored hash.
///
/// Returns `false` on mismatch *and* on a malformed stored hash: the caller
/// must not be able to distinguish the two cases.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("pw12345").unwrap();
        assert!(verify_password("pw12345", &hash));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("pw12345").unwrap();
        assert!(!verify_password("pw12346", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("pw12345").unwrap();
        let b = hash_password("pw12345").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_verifies_false() {
        assert!(!verify_password("pw12345", "not-a-phc-string"));
        assert!(!verify_password("pw12345", ""));
    }

    #[test]
    fn empty_password_cannot_be_hashed() {
        assert_eq!(hash_password(""), Err(PasswordError::HashFailure));
    }
}
