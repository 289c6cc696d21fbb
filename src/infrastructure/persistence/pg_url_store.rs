//! PostgreSQL implementation of the URL store.
//!
//! Forward entry and reverse index live in one row (`code` and `original_digest`
//! are both unique), so a single `INSERT` writes them atomically and concurrent
//! submissions of the same URL cannot create two entries. Hits use an atomic
//! `hits = hits + 1`.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domain::entities::UrlEntry;
use crate::domain::repositories::{StoreError, UrlStore};
use crate::utils::url_digest::original_digest;

#[derive(sqlx::FromRow)]
struct UrlRow {
    code: String,
    original: String,
    hits: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<UrlRow> for UrlEntry {
    type Error = StoreError;

    fn try_from(row: UrlRow) -> Result<Self, Self::Error> {
        let hits = u64::try_from(row.hits).map_err(|_| {
            StoreError::Malformed(format!("negative hit count for '{}'", row.code))
        })?;
        Ok(UrlEntry::new(row.code, row.original, hits, row.created_at))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Malformed(e.to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// PostgreSQL store for short links.
pub struct PgUrlStore {
    pool: Arc<PgPool>,
}

impl PgUrlStore {
    /// Creates a new store over an existing connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Opens a pool with the configured limits and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let database_url = config
            .database_url
            .as_deref()
            .context("DATABASE_URL is not configured")?;

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
            .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to apply migrations")?;

        Ok(Self::new(Arc::new(pool)))
    }
}

#[async_trait]
impl UrlStore for PgUrlStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn put(&self, code: &str, original: &str) -> Result<UrlEntry, StoreError> {
        let digest = original_digest(original);

        let inserted = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (code, original, original_digest)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING code, original, hits, created_at
            "#,
        )
        .bind(code)
        .bind(original)
        .bind(&digest)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(row) = inserted {
            return row.try_into();
        }

        let owner = sqlx::query_scalar::<_, String>(
            "SELECT code FROM urls WHERE original_digest = $1 AND original = $2",
        )
        .bind(&digest)
        .bind(original)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match owner {
            Some(existing_code) if existing_code != code => {
                Err(StoreError::OriginalConflict { existing_code })
            }
            Some(_) => Err(StoreError::CodeConflict(code.to_string())),
            None => {
                let code_taken = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM urls WHERE code = $1)",
                )
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

                if code_taken {
                    Err(StoreError::CodeConflict(code.to_string()))
                } else {
                    // Another URL owns this digest; its code must not be handed out.
                    Err(StoreError::Backend(format!(
                        "digest collision on {digest} for a different url"
                    )))
                }
            }
        }
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<UrlEntry>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            "SELECT code, original, hits, created_at FROM urls WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(UrlEntry::try_from).transpose()
    }

    async fn get_by_original(&self, original: &str) -> Result<Option<String>, StoreError> {
        let code = sqlx::query_scalar::<_, String>(
            "SELECT code FROM urls WHERE original_digest = $1 AND original = $2",
        )
        .bind(original_digest(original))
        .bind(original)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(code)
    }

    async fn increment_hit(&self, code: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE urls SET hits = hits + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlEntry>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT code, original, hits, created_at
            FROM urls
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(UrlEntry::try_from).collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
