//! DTOs for the recent links listing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlEntry;

/// One entry of `GET /api/stats`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsItem {
    pub code: String,
    pub original: String,
    pub hits: u64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlEntry> for UrlStatsItem {
    fn from(entry: UrlEntry) -> Self {
        Self {
            code: entry.code,
            original: entry.original,
            hits: entry.hits,
            created_at: entry.created_at,
        }
    }
}
