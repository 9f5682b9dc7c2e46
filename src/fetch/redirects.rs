//! HTTP redirect handling.
//!
//! Redirects are followed manually, one hop at a time, so every target can be
//! re-validated and re-pinned by the SSRF guard before it is contacted.

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::StatusCode;
use url::Url;

use crate::error_handling::GuardError;

/// Returns true for the statuses the fetcher follows (301, 302, 303, 307, 308).
pub(crate) fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Resolves a response's `Location` header against the URL that produced it.
///
/// # Returns
///
/// - `Ok(Some(url))` with the absolute redirect target
/// - `Ok(None)` if there is no usable `Location` header
///
/// # Errors
///
/// Returns `GuardError::InvalidUrl` if the location cannot be resolved to a URL.
pub(crate) fn redirect_target(
    current: &Url,
    headers: &HeaderMap,
) -> Result<Option<Url>, GuardError> {
    let location = match headers.get(LOCATION).and_then(|v| v.to_str().ok()) {
        Some(loc) if !loc.trim().is_empty() => loc.trim(),
        _ => return Ok(None),
    };

    current
        .join(location)
        .map(Some)
        .map_err(|e| GuardError::InvalidUrl {
            url: location.to_string(),
            reason: e.to_string(),
        })
}
