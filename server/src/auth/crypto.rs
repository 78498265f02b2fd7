use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// 32 random bytes, hex encoded. Used for session and CSRF tokens.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two secrets by digest so timing does not depend on a shared prefix.
pub fn tokens_match(a: &str, b: &str) -> bool {
    hash_token(a) == hash_token(b)
}
