//! One-time tokens: account activation links and throwaway passwords

use rand::Rng;
use sha2::{Digest, Sha256};

/// `bytes` random bytes, hex encoded.
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill(buf.as_mut_slice());
    hex::encode(buf)
}

/// A fresh activation token. Only the hash is persisted.
pub fn generate_activation_token() -> String {
    random_hex(32)
}

/// SHA-256 hex of a token, used for storage and lookup
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Password for provisioned guest accounts; nobody ever sees it.
pub fn generate_placeholder_password() -> String {
    random_hex(32)
}
