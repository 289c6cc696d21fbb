//! Timeout and retry decorator for any [`UrlStore`].
//!
//! Every call is bounded by a deadline. Reads (`get_by_code`, `get_by_original`,
//! `list_recent`, `ping`) are retried with jittered exponential backoff on
//! [`StoreError::is_retryable`] failures. Writes are never retried: a timed-out
//! `put` may have landed, and a repeated `increment_hit` would double count.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::domain::entities::UrlEntry;
use crate::domain::repositories::{StoreError, UrlStore};

const BACKOFF_BASE_MS: u64 = 10;
const BACKOFF_MAX: Duration = Duration::from_millis(250);

pub struct ResilientStore {
    inner: Arc<dyn UrlStore>,
    timeout: Duration,
    read_retries: usize,
}

impl ResilientStore {
    pub fn new(inner: Arc<dyn UrlStore>, timeout: Duration, read_retries: usize) -> Self {
        Self {
            inner,
            timeout,
            read_retries,
        }
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    backend = self.inner.backend_name(),
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(StoreError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        }
    }

    async fn read<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let strategy = ExponentialBackoff::from_millis(BACKOFF_BASE_MS)
            .max_delay(BACKOFF_MAX)
            .map(jitter)
            .take(self.read_retries);

        RetryIf::start(
            strategy,
            || self.timed(operation, call()),
            |e: &StoreError| {
                let retry = e.is_retryable();
                if retry {
                    warn!(operation, error = %e, "Retrying store read");
                }
                retry
            },
        )
        .await
    }
}

#[async_trait]
impl UrlStore for ResilientStore {
    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    async fn put(&self, code: &str, original: &str) -> Result<UrlEntry, StoreError> {
        self.timed("put", self.inner.put(code, original)).await
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<UrlEntry>, StoreError> {
        self.read("get_by_code", || self.inner.get_by_code(code)).await
    }

    async fn get_by_original(&self, original: &str) -> Result<Option<String>, StoreError> {
        self.read("get_by_original", || self.inner.get_by_original(original))
            .await
    }

    async fn increment_hit(&self, code: &str) -> Result<(), StoreError> {
        self.timed("increment_hit", self.inner.increment_hit(code))
            .await
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlEntry>, StoreError> {
        self.read("list_recent", || self.inner.list_recent(limit))
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read("ping", || self.inner.ping()).await
    }

    async fn close(&self) {
        self.inner.close().await;
    }
}
