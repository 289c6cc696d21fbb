//! Redis implementation of the URL store, using blob-style JSON records.
//!
//! # Key layout
//!
//! - `{prefix}:urls:{code}`     - JSON entry `{code, original, hits, createdAt, seq}`
//! - `{prefix}:lookup:{digest}` - JSON reverse-index record `{code, original}`
//! - `{prefix}:codes`           - set of all codes, used for listing
//! - `{prefix}:seq`             - insertion counter, breaks `createdAt` ties
//!
//! # Consistency
//!
//! Records are written one key at a time, like objects in a blob store:
//!
//! - `put` claims the entry key with `SET NX`, then writes the reverse index. If
//!   the second write fails the entry stays and [`StoreError::PartialWrite`] is
//!   returned; nothing is rolled back.
//! - Two concurrent `put`s of the same new URL both succeed under different
//!   codes; the last reverse-index write wins.
//! - `increment_hit` is read-modify-write, so concurrent hits can be lost.
//! - `list_recent` loads every entry and sorts in memory: O(n) per call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::domain::entities::UrlEntry;
use crate::domain::repositories::{StoreError, UrlStore};
use crate::utils::url_digest::original_digest;

const DEFAULT_KEY_PREFIX: &str = "urlsh";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    code: String,
    original: String,
    hits: u64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    seq: u64,
}

impl StoredEntry {
    fn into_entry(self) -> UrlEntry {
        UrlEntry::new(self.code, self.original, self.hits, self.created_at)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LookupRecord {
    code: String,
    #[serde(default)]
    original: Option<String>,
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Malformed(e.to_string())
    }
}

/// Redis store for short links.
///
/// Uses `ConnectionManager`, which reconnects transparently and is cheap to clone
/// per call.
pub struct RedisUrlStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisUrlStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        Self::connect_with_prefix(redis_url, DEFAULT_KEY_PREFIX).await
    }

    /// Like [`Self::connect`], with a custom key namespace.
    pub async fn connect_with_prefix(redis_url: &str, prefix: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            prefix: prefix.to_string(),
        })
    }

    fn entry_key(&self, code: &str) -> String {
        format!("{}:urls:{}", self.prefix, code)
    }

    fn lookup_key(&self, original: &str) -> String {
        format!("{}:lookup:{}", self.prefix, original_digest(original))
    }

    fn codes_key(&self) -> String {
        format!("{}:codes", self.prefix)
    }

    fn seq_key(&self) -> String {
        format!("{}:seq", self.prefix)
    }

    async fn load(&self, code: &str) -> Result<Option<StoredEntry>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.entry_key(code)).await?;

        raw.map(|json| serde_json::from_str::<StoredEntry>(&json))
            .transpose()
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl UrlStore for RedisUrlStore {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, code: &str, original: &str) -> Result<UrlEntry, StoreError> {
        let mut conn = self.conn.clone();

        let seq: u64 = conn.incr(self.seq_key(), 1u64).await?;
        let entry = UrlEntry::fresh(code, original);
        let stored = StoredEntry {
            code: entry.code.clone(),
            original: entry.original.clone(),
            hits: entry.hits,
            created_at: entry.created_at,
            seq,
        };

        let claimed: bool = conn
            .set_nx(self.entry_key(code), serde_json::to_string(&stored)?)
            .await?;
        if !claimed {
            return Err(StoreError::CodeConflict(code.to_string()));
        }

        let lookup = serde_json::to_string(&LookupRecord {
            code: code.to_string(),
            original: Some(original.to_string()),
        })?;

        redis::pipe()
            .atomic()
            .sadd(self.codes_key(), code)
            .ignore()
            .set(self.lookup_key(original), lookup)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| {
                error!(code = %code, error = %e, "Entry stored without reverse index");
                StoreError::PartialWrite {
                    code: code.to_string(),
                    reason: e.to_string(),
                }
            })?;

        Ok(entry)
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<UrlEntry>, StoreError> {
        Ok(self.load(code).await?.map(StoredEntry::into_entry))
    }

    async fn get_by_original(&self, original: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.lookup_key(original)).await?;

        let Some(json) = raw else {
            return Ok(None);
        };
        let record: LookupRecord = serde_json::from_str(&json)?;

        match record.original {
            Some(ref stored) if stored != original => {
                debug!(code = %record.code, "Reverse index digest collision, ignoring");
                Ok(None)
            }
            _ => Ok(Some(record.code)),
        }
    }

    async fn increment_hit(&self, code: &str) -> Result<(), StoreError> {
        let Some(mut stored) = self.load(code).await? else {
            return Ok(());
        };
        stored.hits = stored.hits.saturating_add(1);

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.entry_key(code), serde_json::to_string(&stored)?)
            .await?;

        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlEntry>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let codes: Vec<String> = conn.smembers(self.codes_key()).await?;
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = codes.iter().map(|c| self.entry_key(c)).collect();
        let raws: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;

        let mut entries = raws
            .into_iter()
            .flatten()
            .map(|json| serde_json::from_str::<StoredEntry>(&json))
            .collect::<Result<Vec<_>, _>>()?;

        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        entries.truncate(limit);

        Ok(entries.into_iter().map(StoredEntry::into_entry).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await?;
        Ok(())
    }

    async fn close(&self) {
        debug!("Redis store closed");
    }
}
