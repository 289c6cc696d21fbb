//! Content-derived keys for the reverse (original URL → code) index.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
pub const DIGEST_LEN: usize = 24;

/// Returns the fixed-length reverse-index key for a normalized URL.
///
/// The key length is bounded regardless of URL length, which keeps index keys
/// usable as Redis keys and as a narrow unique column in Postgres.
pub fn original_digest(normalized_url: &str) -> String {
    let hash = Sha256::digest(normalized_url.as_bytes());
    let mut key = hex::encode(hash);
    key.truncate(DIGEST_LEN);
    key
}
