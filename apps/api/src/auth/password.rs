use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;
use thiserror::Error;

/// Stands in for an account's hash on unknown emails, so a failed login
/// costs the same whether or not the email is registered.
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("no-such-account").unwrap_or_default());

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hashes `password` with Argon2id and a fresh random salt. Returns a PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// `false` for a wrong password and for a malformed stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Login check. With no account the password is still run through Argon2
/// against a fixed hash, and the result is always `false`.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            verify_password(password, &DUMMY_HASH);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("Correct horse battery staple", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_login_without_account_always_fails() {
        assert!(DUMMY_HASH.starts_with("$argon2id$"));
        assert!(!verify_login("no-such-account", None));
        assert!(!verify_login("anything", None));
    }

    #[test]
    fn test_verify_login_with_account() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_login("s3cret", Some(&hash)));
        assert!(!verify_login("wrong", Some(&hash)));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
