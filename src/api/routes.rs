//! API route configuration.

use crate::api::handlers::{shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Create or reuse a short link
/// - `GET  /stats`   - 20 most recent links with hit counts
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats", get(stats_handler))
}
