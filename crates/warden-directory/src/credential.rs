//! Credential digests.
//!
//! Secrets are never stored. Each account keeps a SHA-256 digest salted with
//! the user's id, so two users with the same secret have different digests.
//!
//! Digest input layout (bytes, in order):
//!   1. user id as its 16 raw UUID bytes
//!   2. secret as UTF-8 bytes

use sha2::{Digest, Sha256};

use warden_core::UserId;

/// Compute the lowercase hex digest of `secret` for `id`.
pub fn digest_secret(id: &UserId, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.0.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// True if `secret` hashes to `digest` for `id`.
///
/// Compares every byte regardless of where the first mismatch is.
pub fn verify_secret(id: &UserId, secret: &str, digest: &str) -> bool {
    let computed = digest_secret(id, secret);
    computed.len() == digest.len()
        && computed
            .bytes()
            .zip(digest.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
