//! Content hashing for sync operations.
//!
//! Exported documents are compared by SHA256 of their rendered bytes so an
//! unchanged document is never rewritten.

use sha2::{Digest, Sha256};

/// Compute a SHA256 hash of raw bytes as lowercase hex.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Check if content has changed relative to a stored hash.
///
/// Returns `true` if there is no stored hash or the hashes differ.
#[must_use]
pub fn has_changed(current_hash: &str, stored_hash: Option<&str>) -> bool {
    stored_hash.is_none_or(|h| h != current_hash)
}
