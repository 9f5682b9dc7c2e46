//! Error type definitions.
//!
//! This module defines every error raised by the pipeline and the coarse
//! categories reported across the service boundary.

use std::net::IpAddr;
use std::time::Duration;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Rejections raised by the SSRF guard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The URL could not be parsed, is too long, or has no host.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The URL uses a scheme other than http or https.
    #[error("Unsupported URL scheme '{0}' (only http and https are allowed)")]
    UnsupportedScheme(String),

    /// The host is a localhost name or a literal private/reserved address.
    #[error("Forbidden host '{0}'")]
    ForbiddenHost(String),

    /// DNS resolution itself failed.
    #[error("DNS lookup failed for '{host}': {message}")]
    DnsFailure { host: String, message: String },

    /// DNS answered, but only with private/reserved addresses.
    #[error("Host '{host}' resolves only to forbidden addresses (first: {address})")]
    ForbiddenAddress { host: String, address: IpAddr },
}

/// Failures of a single feed fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The initial URL or a redirect target was rejected by the SSRF guard.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// The redirect budget was exhausted.
    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),

    /// The upstream answered with a non-success, non-redirect status.
    #[error("Upstream responded with HTTP status {0}")]
    HttpStatus(u16),

    /// The body crossed the byte cap. `received` is the byte count at the moment
    /// of abort, or the declared `Content-Length` when that alone exceeds the cap.
    #[error("Response body too large: {received} bytes exceeds the {limit} byte limit")]
    TooLarge { limit: usize, received: usize },

    /// The body could not be decoded according to its Content-Encoding.
    #[error("Failed to decode response body: {0}")]
    DecodeFailure(String),

    /// A single hop exceeded its wall-clock budget.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Socket, TLS or protocol level error.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Network(with_causes(&error))
    }
}

/// Display of an error followed by each distinct cause in its source chain.
///
/// reqwest keeps the socket-level reason in the chain, not in its own message.
fn with_causes(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

/// Malformed feed XML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse feed XML at byte {position}: {message}")]
pub struct ParseError {
    /// Byte offset in the document where parsing stopped
    pub position: u64,
    /// Human-readable reason
    pub message: String,
}

/// Coarse error classification reported at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorCategory {
    /// Missing or invalid caller parameters; no fetch was attempted
    BadInput,
    /// Invalid scheme, private/loopback target, or private-only DNS answer
    SsrfRejected,
    /// Network error, timeout, non-2xx status, too many redirects
    UpstreamUnreachable,
    /// Body exceeded the byte cap
    PayloadRejected,
    /// Compressed payload could not be decoded
    DecodeFailed,
    /// Feed XML is malformed
    ParseFailed,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::BadInput => "Bad input",
            ErrorCategory::SsrfRejected => "Target rejected",
            ErrorCategory::UpstreamUnreachable => "Upstream unreachable",
            ErrorCategory::PayloadRejected => "Payload too large",
            ErrorCategory::DecodeFailed => "Payload decode failed",
            ErrorCategory::ParseFailed => "Feed parse failed",
        }
    }

    /// HTTP status the surrounding layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::BadInput => 400,
            _ => 502,
        }
    }
}
