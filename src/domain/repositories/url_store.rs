//! Store trait for short link persistence and deduplication.

use std::time::Duration;

use crate::domain::entities::UrlEntry;
use async_trait::async_trait;

/// Errors reported by [`UrlStore`] implementations.
///
/// A missing code or URL is never an error; lookups return `Ok(None)` for that.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The short code is already assigned to another entry.
    #[error("short code '{0}' is already taken")]
    CodeConflict(String),

    /// The URL was stored concurrently under another code.
    ///
    /// Only reported by backends that enforce dedup atomically.
    #[error("URL is already stored under code '{existing_code}'")]
    OriginalConflict { existing_code: String },

    /// Connection, protocol or query failure.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A stored record could not be decoded.
    #[error("malformed stored record: {0}")]
    Malformed(String),

    /// The forward entry was written but the reverse index was not.
    #[error("partial write for code '{code}': {reason}")]
    PartialWrite { code: String, reason: String },
}

impl StoreError {
    /// Returns `true` for transient failures that are safe to retry on reads.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Backend(_) | StoreError::Timeout { .. })
    }
}

/// Persistence interface for short links.
///
/// Maps codes to [`UrlEntry`] values, maintains the original → code reverse
/// index used for deduplication, and serves a recency-ordered listing.
///
/// All methods may be called concurrently. None of them takes a lock spanning
/// more than one call.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL, atomic dedup and counters
/// - [`crate::infrastructure::persistence::RedisUrlStore`] - blob-style records, best-effort dedup
/// - [`crate::infrastructure::persistence::MemoryUrlStore`] - process-local
/// - [`crate::infrastructure::persistence::ResilientStore`] - timeout and retry decorator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Creates an entry with zero hits and writes its reverse-index record.
    ///
    /// `original` must already be normalized.
    ///
    /// # Errors
    ///
    /// - [`StoreError::CodeConflict`] if `code` is taken
    /// - [`StoreError::OriginalConflict`] if another code won a concurrent insert
    ///   of the same URL (atomic backends only)
    /// - [`StoreError::PartialWrite`] if only the forward entry was persisted
    async fn put(&self, code: &str, original: &str) -> Result<UrlEntry, StoreError>;

    /// Looks up an entry by code.
    async fn get_by_code(&self, code: &str) -> Result<Option<UrlEntry>, StoreError>;

    /// Looks up the code owning a normalized URL. Matching is string-exact.
    async fn get_by_original(&self, original: &str) -> Result<Option<String>, StoreError>;

    /// Adds one hit to `code`. Unknown codes are a silent no-op.
    async fn increment_hit(&self, code: &str) -> Result<(), StoreError>;

    /// Returns up to `limit` entries, newest first, ties in insertion order.
    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlEntry>, StoreError>;

    /// Checks backend connectivity.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases backend resources. Called once on shutdown.
    async fn close(&self);
}
