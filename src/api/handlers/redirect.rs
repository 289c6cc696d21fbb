//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::debug;

use crate::domain::hit_worker::enqueue_hit;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Answers `301 Moved Permanently` with the stored URL in `Location`.
/// The hit is queued for the background worker and counted after the
/// response is sent. A full queue drops the hit; the redirect still succeeds.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist or is malformed.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let Some(entry) = state.link_service.resolve(&code).await? else {
        debug!(code = %code, "Unknown short code");
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "code": code }),
        ));
    };

    enqueue_hit(&state.hit_sender, entry.code);

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, entry.original)],
    ))
}
