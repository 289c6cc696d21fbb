//! Public origin extraction from HTTP request headers.

use axum::http::{HeaderMap, header};

const FORWARDED_HOST: &str = "x-forwarded-host";
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Fallback host when the request carries neither `X-Forwarded-Host` nor `Host`.
const FALLBACK_HOST: &str = "localhost";

/// Builds the public origin (`scheme://host[:port]`) a client used to reach us.
///
/// Priority:
/// 1. `X-Forwarded-Host` / `X-Forwarded-Proto` (set by reverse proxies)
/// 2. `Host`, with `http` as the scheme
///
/// Only the first value of a comma-separated forwarded header is used. The port
/// is kept, since short links must point back at the same listener.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "localhost:3000".parse().unwrap());
///
/// assert_eq!(extract_origin_from_headers(&headers), "http://localhost:3000");
/// ```
pub fn extract_origin_from_headers(headers: &HeaderMap) -> String {
    let host = first_value(headers, FORWARDED_HOST)
        .or_else(|| first_value(headers, header::HOST.as_str()))
        .unwrap_or(FALLBACK_HOST);

    let proto = match first_value(headers, FORWARDED_PROTO) {
        Some(p) if p.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };

    format!("{proto}://{host}")
}

/// Joins an origin and a code into a short URL.
pub fn short_url(origin: &str, code: &str) -> String {
    format!("{}/{}", origin.trim_end_matches('/'), code)
}

fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
