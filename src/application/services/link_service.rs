//! Link creation, resolution and listing service.

use std::sync::Arc;

use crate::domain::entities::UrlEntry;
use crate::domain::repositories::{StoreError, UrlStore};
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_well_formed};
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Number of generated codes tried before giving up on a shorten request.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Default size of the recent-links listing.
pub const RECENT_LIMIT: usize = 20;

/// Result of a shorten request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub code: String,
    pub original: String,
    pub hits: u64,
    /// `false` when an existing entry for the same URL was reused.
    pub created: bool,
}

/// Service for creating, resolving and listing short links.
///
/// Normalizes input, deduplicates through the store's reverse index and
/// retries code generation on collisions.
pub struct LinkService {
    store: Arc<dyn UrlStore>,
    generator: Arc<dyn CodeGenerator>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(store: Arc<dyn UrlStore>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self { store, generator }
    }

    /// The underlying store, for health checks and the hit worker.
    pub fn store(&self) -> Arc<dyn UrlStore> {
        self.store.clone()
    }

    /// Shortens `long_url`, reusing the existing code if the URL was seen before.
    ///
    /// # Deduplication
    ///
    /// The URL is normalized first, so equivalent spellings share a code. A reused
    /// entry reports its current hit count.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] if the URL is malformed or not http/https
    /// - [`AppError::ExhaustedRetries`] if every generated code collided
    /// - [`AppError::BackendIo`] / [`AppError::PartialWrite`] on storage failures
    pub async fn shorten(&self, long_url: &str) -> Result<Shortened, AppError> {
        let original = normalize_url(long_url)?;

        if let Some(existing) = self.find_existing(&original).await? {
            return Ok(existing);
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.generator.generate();

            match self.store.put(&code, &original).await {
                Ok(entry) => {
                    info!(code = %entry.code, original = %entry.original, "Short link created");
                    return Ok(Shortened {
                        code: entry.code,
                        original: entry.original,
                        hits: entry.hits,
                        created: true,
                    });
                }
                Err(StoreError::CodeConflict(taken)) => {
                    warn!(code = %taken, attempt, "Generated code collided, retrying");
                }
                Err(StoreError::OriginalConflict { existing_code }) => {
                    debug!(code = %existing_code, "URL stored concurrently, reusing its code");
                    let hits = self
                        .store
                        .get_by_code(&existing_code)
                        .await?
                        .map_or(0, |e| e.hits);
                    return Ok(Shortened {
                        code: existing_code,
                        original,
                        hits,
                        created: false,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::exhausted_retries(
            "Failed to generate a unique code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Resolves a code to its entry. `Ok(None)` means the code does not exist.
    pub async fn resolve(&self, code: &str) -> Result<Option<UrlEntry>, AppError> {
        if !is_well_formed(code) {
            return Ok(None);
        }

        Ok(self.store.get_by_code(code).await?)
    }

    /// Returns up to `limit` most recently created entries.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<UrlEntry>, AppError> {
        Ok(self.store.list_recent(limit).await?)
    }

    /// Looks up an existing entry for a normalized URL.
    ///
    /// A reverse-index record whose forward entry is gone (left behind by a
    /// partial write) is treated as a miss so the URL can be stored again.
    async fn find_existing(&self, original: &str) -> Result<Option<Shortened>, AppError> {
        let Some(code) = self.store.get_by_original(original).await? else {
            return Ok(None);
        };

        match self.store.get_by_code(&code).await? {
            Some(entry) => Ok(Some(Shortened {
                code: entry.code,
                original: entry.original,
                hits: entry.hits,
                created: false,
            })),
            None => {
                warn!(code = %code, "Reverse index points at a missing entry, recreating");
                Ok(None)
            }
        }
    }
}
