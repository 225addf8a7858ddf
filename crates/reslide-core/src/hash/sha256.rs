use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a part's bytes, used to identify media content.
pub fn sha256_hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
