//! Argon2 password hashing for the admin account.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand::rngs::OsRng;
use std::sync::LazyLock;

/// Use insecure (fast) password hashing for dev/test environments
static INSECURE_HASHING: LazyLock<bool> =
    LazyLock::new(|| std::env::var("INSECURE_PASSWORD_HASHING").is_ok());

fn get_argon2() -> Argon2<'static> {
    if *INSECURE_HASHING {
        // Minimal params for fast dev/test - NOT SECURE FOR PRODUCTION
        match Params::new(1024, 1, 1, None) {
            Ok(params) => Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
            Err(_) => Argon2::default(),
        }
    } else {
        Argon2::default()
    }
}

/// Hash `password` into a PHC string suitable for `ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = get_argon2().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    // Params are read from the PHC string, so the insecure toggle does not matter here.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("changeme").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("changeme", &hash));
        assert!(!verify_password("changeme2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_rejected() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }
}
