//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum accepted length of a submitted URL.
pub const MAX_URL_LENGTH: u64 = 2048;

/// Request to shorten a single URL.
///
/// A missing `url` deserializes as empty and fails validation, so both cases
/// produce the same 400 response.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_URL_LENGTH, message = "url must be 1 to 2048 characters"))]
    pub url: String,
}

/// Shortened link returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub code: String,
    pub hits: u64,
}
