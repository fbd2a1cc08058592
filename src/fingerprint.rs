//! Content fingerprinting for change detection
//!
//! A fingerprint is a hex-encoded SHA-256 digest of the content bytes. It is
//! used both for per-page change tracking and for the master record's
//! "no new content" decision. Identical bytes always produce the identical
//! fingerprint; collision resistance well beyond what accidental merges of
//! distinct page text would require.

use sha2::{Digest, Sha256};

/// Computes the fingerprint of a piece of content
///
/// # Arguments
///
/// * `content` - The content to fingerprint
///
/// # Returns
///
/// Hex-encoded SHA-256 hash of the content bytes
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
