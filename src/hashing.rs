//! SHA-256 hashing of prompt text.

use sha2::{Digest, Sha256};

/// Size in bytes of a prompt digest
pub const DIGEST_LEN: usize = 32;

/// Calculate the SHA-256 digest of the UTF-8 bytes of `prompt`
#[must_use]
pub fn hash_prompt(prompt: &str) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Lowercase hex rendering of a digest, for log lines
#[must_use]
pub fn to_hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
