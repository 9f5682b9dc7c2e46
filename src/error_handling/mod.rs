//! Error handling and classification.
//!
//! This module provides:
//! - Error types for the guard, the fetcher, the feed parser and initialization
//! - The boundary classification ([`ErrorCategory`]) and the single error type
//!   that crosses the service boundary ([`ServiceError`])

mod categorization;
mod types;

pub use categorization::{categorize_fetch_error, categorize_guard_error};
pub use types::{ErrorCategory, FetchError, GuardError, InitializationError, ParseError};

use crate::utils::sanitize::sanitize_and_truncate_error_message;

/// Error reported to the caller: a category plus a caller-facing message.
///
/// The message is built from the `Display` of the underlying error only, with
/// control characters removed and length capped; no source chain is kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{category}: {message}")]
pub struct ServiceError {
    pub category: ErrorCategory,
    pub message: String,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, message: impl AsRef<str>) -> Self {
        Self {
            category,
            message: sanitize_and_truncate_error_message(message.as_ref()),
        }
    }

    /// Missing or invalid caller input.
    pub fn bad_input(message: impl AsRef<str>) -> Self {
        Self::new(ErrorCategory::BadInput, message)
    }

    /// HTTP status the surrounding layer should answer with.
    pub fn status_code(&self) -> u16 {
        self.category.status_code()
    }
}

impl From<FetchError> for ServiceError {
    fn from(error: FetchError) -> Self {
        Self::new(categorize_fetch_error(&error), error.to_string())
    }
}

impl From<ParseError> for ServiceError {
    fn from(error: ParseError) -> Self {
        Self::new(ErrorCategory::ParseFailed, error.to_string())
    }
}
