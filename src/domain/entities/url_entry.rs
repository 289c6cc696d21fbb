//! Url entry entity representing a stored short link.

use chrono::{DateTime, Utc};

/// A stored mapping from a short code to its original URL.
///
/// `code`, `original` and `created_at` never change after creation. `hits` only
/// grows, one unit per resolved redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub code: String,
    pub original: String,
    pub hits: u64,
    pub created_at: DateTime<Utc>,
}

impl UrlEntry {
    /// Creates an entry with explicit field values (used when loading from a backend).
    pub fn new(code: String, original: String, hits: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            original,
            hits,
            created_at,
        }
    }

    /// Creates a freshly shortened entry: zero hits, created now.
    pub fn fresh(code: impl Into<String>, original: impl Into<String>) -> Self {
        Self::new(code.into(), original.into(), 0, Utc::now())
    }

    /// Returns a copy with the hit counter advanced by one.
    pub fn with_hit(&self) -> Self {
        Self {
            hits: self.hits.saturating_add(1),
            ..self.clone()
        }
    }
}
