//! Configuration constants.
//!
//! This module defines the operational limits of the fetch pipeline (redirect
//! budget, byte caps, timeouts) and the defaults used by the boundary layer.

use std::time::Duration;

// Redirect handling
/// Maximum number of redirect hops to follow.
/// A chain of three redirects succeeds, the fourth fails with `TooManyRedirects`.
pub const MAX_REDIRECTS: usize = 3;

// Response and body size limits
/// Maximum response body size in bytes (5MB), counted on the wire.
/// The transfer is aborted as soon as the running byte counter crosses this value.
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;
/// Maximum decoded body size in bytes (32MB).
/// Bounds the output of gzip/deflate/brotli decoding so a small compressed
/// payload cannot expand without limit.
pub const MAX_DECODED_BODY_SIZE: usize = 32 * 1024 * 1024;

// Network operation timeouts
/// Wall-clock timeout for a single request hop (connect, headers and body).
/// Applied per redirect hop, not to the whole chain.
pub const HOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum accepted URL length (2048 characters), matching common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Default User-Agent string for feed requests.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "podcast_feed/",
    env!("CARGO_PKG_VERSION"),
    " (+feed fetcher; RSS/Atom podcast reader)"
);

/// Accept-Encoding value sent on every request; each listed coding is decoded locally.
pub const ACCEPT_ENCODING: &str = "gzip, deflate, br";
/// Accept value sent on every request.
pub const ACCEPT_FEED: &str =
    "application/rss+xml, application/atom+xml, application/xml;q=0.9, text/xml;q=0.9, */*;q=0.8";

// Feed parsing
/// Deepest element nesting accepted in a feed document.
pub const MAX_XML_DEPTH: usize = 256;

// Pagination
/// Page size used when the caller does not give one.
pub const DEFAULT_PAGE_LIMIT: usize = 10;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: usize = 50;

// Response caching hint
/// Max-age advertised for a non-empty podcast or episode page.
pub const CACHE_MAX_AGE_SECS: u64 = 600;

/// Maximum length of an error message returned to the caller.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 500;
