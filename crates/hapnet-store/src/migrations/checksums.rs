//! Checksums for migrations
//!
//! A migration's SHA256 is recorded when it is applied and compared on every
//! later open, so an edited migration is caught instead of silently skipped.

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string, hex encoded
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
