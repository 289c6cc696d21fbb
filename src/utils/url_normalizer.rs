//! URL normalization and sanitization utilities.
//!
//! The normalized string is the dedup key: two submissions that normalize to the
//! same string share one short code.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed, got '{0}'")]
    UnsupportedProtocol(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: Only HTTP and HTTPS are allowed
/// 2. **Hostname**: Lowercased by the parser (IDNA for Unicode hosts)
/// 3. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: Removed (e.g., `#section`)
/// 5. **Empty path**: Becomes `/`
/// 6. **Query parameters and path**: Preserved as-is
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path#top").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlNormalizationError::UnsupportedProtocol(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple_https() {
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_normalize_keeps_query() {
        assert_eq!(
            normalize_url("https://example.com/a?x=1").unwrap(),
            "https://example.com/a?x=1"
        );
    }

    #[test]
    fn test_normalize_uppercase_host() {
        assert_eq!(
            normalize_url("https://EXAMPLE.COM/Path").unwrap(),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_normalize_remove_default_ports() {
        assert_eq!(
            normalize_url("http://example.com:80/path").unwrap(),
            "http://example.com/path"
        );
        assert_eq!(
            normalize_url("https://example.com:443/path").unwrap(),
            "https://example.com/path"
        );
    }

    #[test]
    fn test_normalize_keep_custom_port() {
        assert_eq!(
            normalize_url("http://example.com:8080/path").unwrap(),
            "http://example.com:8080/path"
        );
    }

    #[test]
    fn test_normalize_remove_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page?key=value#section").unwrap(),
            "https://example.com/page?key=value"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://example.com/x \n").unwrap(),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_equivalent_inputs_share_a_key() {
        let a = normalize_url("HTTPS://Example.com:443/a?x=1#frag").unwrap();
        let b = normalize_url("https://example.com/a?x=1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_invalid_url() {
        assert!(matches!(
            normalize_url("not a valid url").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
        assert!(matches!(
            normalize_url("").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
        assert!(matches!(
            normalize_url("example.com").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_ftp_protocol() {
        let err = normalize_url("ftp://example.com/file").unwrap_err();
        assert!(matches!(err, UrlNormalizationError::UnsupportedProtocol(ref s) if s == "ftp"));
    }

    #[test]
    fn test_normalize_other_protocols() {
        for input in [
            "file:///home/user/document.txt",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
        ] {
            assert!(
                matches!(
                    normalize_url(input).unwrap_err(),
                    UrlNormalizationError::UnsupportedProtocol(_)
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_very_long_url() {
        let url = format!("https://example.com/{}", "a".repeat(2000));
        assert!(normalize_url(&url).unwrap().len() > 2000);
    }

    #[test]
    fn test_normalize_unicode_domain() {
        assert_eq!(
            normalize_url("https://münchen.de").unwrap(),
            "https://xn--mnchen-3ya.de/"
        );
    }
}
