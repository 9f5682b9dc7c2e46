//! Error categorization.
//!
//! Maps pipeline failures onto the coarse [`ErrorCategory`] reported at the
//! service boundary.

use super::types::{ErrorCategory, FetchError, GuardError};

/// Categorizes a [`GuardError`].
///
/// A failed DNS lookup is an upstream problem; everything else the guard
/// rejects is an SSRF rejection.
pub fn categorize_guard_error(error: &GuardError) -> ErrorCategory {
    match error {
        GuardError::DnsFailure { .. } => ErrorCategory::UpstreamUnreachable,
        GuardError::InvalidUrl { .. }
        | GuardError::UnsupportedScheme(_)
        | GuardError::ForbiddenHost(_)
        | GuardError::ForbiddenAddress { .. } => ErrorCategory::SsrfRejected,
    }
}

/// Categorizes a [`FetchError`].
///
/// # Arguments
///
/// * `error` - The fetch failure to categorize
///
/// # Returns
///
/// The category the service boundary reports for the failure.
pub fn categorize_fetch_error(error: &FetchError) -> ErrorCategory {
    match error {
        FetchError::Guard(guard) => categorize_guard_error(guard),
        FetchError::TooManyRedirects(_)
        | FetchError::HttpStatus(_)
        | FetchError::Timeout(_)
        | FetchError::Network(_) => ErrorCategory::UpstreamUnreachable,
        FetchError::TooLarge { .. } => ErrorCategory::PayloadRejected,
        FetchError::DecodeFailure(_) => ErrorCategory::DecodeFailed,
    }
}
