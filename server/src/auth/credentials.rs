use nfg_core::password::verify_password;

use super::crypto::tokens_match;
use crate::config::AdminCredentials;

/// Check a login attempt against the configured admin account.
///
/// With a password hash configured the plain password is never consulted.
pub fn check_admin_credentials(admin: &AdminCredentials, username: &str, password: &str) -> bool {
    if username.is_empty() || username != admin.username {
        return false;
    }

    match &admin.password_hash {
        Some(hash) => verify_password(password, hash),
        None => tokens_match(password, &admin.password),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfg_core::password::hash_password;

    fn admin(password_hash: Option<String>) -> AdminCredentials {
        AdminCredentials {
            username: "admin".to_string(),
            password: "changeme".to_string(),
            password_hash,
        }
    }

    #[test]
    fn test_plain_password() {
        let admin = admin(None);
        assert!(check_admin_credentials(&admin, "admin", "changeme"));
        assert!(!check_admin_credentials(&admin, "admin", "wrong"));
        assert!(!check_admin_credentials(&admin, "root", "changeme"));
        assert!(!check_admin_credentials(&admin, "", ""));
    }

    #[test]
    fn test_hash_overrides_plain_password() {
        let hash = hash_password("s3cret").unwrap();
        let admin = admin(Some(hash));
        assert!(check_admin_credentials(&admin, "admin", "s3cret"));
        assert!(!check_admin_credentials(&admin, "admin", "changeme"));
    }

    #[test]
    fn test_malformed_hash_rejects() {
        let admin = admin(Some("not-a-phc-string".to_string()));
        assert!(!check_admin_credentials(&admin, "admin", "changeme"));
    }
}
