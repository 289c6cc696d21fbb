//! Storage backends for short links.
//!
//! Concrete implementations of [`UrlStore`]:
//!
//! - [`PgUrlStore`] - PostgreSQL, one row per entry, atomic dedup and hit counts
//! - [`RedisUrlStore`] - JSON records per key, best-effort dedup
//! - [`MemoryUrlStore`] - process-local maps for development and tests
//!
//! [`open_store`] builds the configured backend and wraps it in
//! [`ResilientStore`], which adds per-call deadlines and read retries.

pub mod memory_url_store;
pub mod pg_url_store;
pub mod redis_url_store;
pub mod resilient_store;

pub use memory_url_store::MemoryUrlStore;
pub use pg_url_store::PgUrlStore;
pub use redis_url_store::RedisUrlStore;
pub use resilient_store::ResilientStore;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::UrlStore;

/// Connects the backend selected by `config.storage_backend`.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or migrations fail.
pub async fn open_store(config: &Config) -> Result<Arc<dyn UrlStore>> {
    let backend: Arc<dyn UrlStore> = match config.storage_backend {
        StorageBackend::Postgres => Arc::new(PgUrlStore::connect(config).await?),
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is not configured")?;
            Arc::new(
                RedisUrlStore::connect(url)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
        StorageBackend::Memory => Arc::new(MemoryUrlStore::new()),
    };

    tracing::info!(backend = backend.backend_name(), "Store ready");

    Ok(Arc::new(ResilientStore::new(
        backend,
        config.store_timeout(),
        config.store_read_retries,
    )))
}
