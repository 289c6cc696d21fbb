//! Handler for the recent links listing.

use axum::{Json, extract::State};

use crate::api::dto::stats::UrlStatsItem;
use crate::application::services::RECENT_LIMIT;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the most recently created short links with their hit counts.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// # Response
///
/// Up to 20 entries, newest first:
///
/// ```json
/// [
///   {
///     "code": "aZ3_k9Q",
///     "original": "https://example.com/",
///     "hits": 12,
///     "createdAt": "2026-01-01T12:00:00Z"
///   }
/// ]
/// ```
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UrlStatsItem>>, AppError> {
    let entries = state.link_service.list_recent(RECENT_LIMIT).await?;

    Ok(Json(entries.into_iter().map(UrlStatsItem::from).collect()))
}
