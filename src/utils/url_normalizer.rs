//! Destination URL normalization.
//!
//! Every destination is stored and fed to the slug pipeline in one canonical
//! form, so the pattern detector and the suggestion cache key see the same
//! string for `HTTPS://GitHub.com:443/a#readme` and `https://github.com/a`.

use url::Url;

/// Longest destination URL accepted for shortening.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a destination URL to its canonical form.
///
/// Surrounding whitespace is trimmed, the host is lowercased, the default
/// port and the fragment are dropped, and an empty `?` is removed. Path and
/// query keep their case because both are significant to the destination.
///
/// # Errors
///
/// Anything other than an absolute `http`/`https` URL with a host is rejected,
/// as are inputs longer than [`MAX_URL_LENGTH`].
///
/// # Examples
///
/// ```
/// use smartlink::utils::url_normalizer::normalize_url;
///
/// assert_eq!(
///     normalize_url(" HTTPS://GitHub.com:443/rust-lang/rust#readme ").unwrap(),
///     "https://github.com/rust-lang/rust"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    let mut url =
        Url::parse(trimmed).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    // Parsing already lowercases the host and strips default ports.
    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlNormalizationError::MissingHost),
    }

    url.set_fragment(None);
    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url.to_string())
}
