//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::{extract_origin_from_headers, short_url};

/// Creates (or reuses) the short link for a URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/page" }
/// ```
///
/// # Response
///
/// ```json
/// { "shortUrl": "https://sho.rt/aZ3_k9Q", "code": "aZ3_k9Q", "hits": 0 }
/// ```
///
/// Submitting a URL that is already stored returns its existing code and
/// current hit count.
///
/// # Errors
///
/// - 400 if the body is malformed, `url` is missing or empty, or the URL is not http(s)
/// - 503 if the store is unavailable
/// - 500 if no free code was found or the write was only partially applied
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let shortened = state.link_service.shorten(&payload.url).await?;

    let origin = match state.public_base_url {
        Some(ref base) => base.clone(),
        None => extract_origin_from_headers(&headers),
    };

    Ok(Json(ShortenResponse {
        short_url: short_url(&origin, &shortened.code),
        code: shortened.code,
        hits: shortened.hits,
    }))
}
