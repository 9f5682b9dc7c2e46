//! Safe feed fetching.
//!
//! [`FeedFetcher::fetch`] turns a caller-supplied URL into feed text:
//! 1. The URL is validated by the SSRF guard.
//! 2. Each hop pins the host to a public address and connects only there.
//! 3. Redirects are followed in an explicit loop with a fixed budget; every
//!    target goes back through step 1.
//! 4. The body is streamed under a byte cap, then decoded per Content-Encoding.
//!
//! Every hop runs under its own wall-clock timeout. When a hop fails, times
//! out, or crosses the byte cap, its future is dropped, which drops the
//! response and closes the socket. Nothing is retried.

mod body;
mod decode;
mod redirects;
mod request;

use log::{debug, info};
use url::Url;

use crate::config::FetchLimits;
use crate::error_handling::FetchError;
use crate::initialization::init_pinned_client;
use crate::security::SsrfGuard;

use body::{drain_body, read_body_with_limit};
use decode::decode_body;
use redirects::{is_followed_redirect, redirect_target};
use request::{apply_feed_headers, content_encoding};

/// Result of a single request hop.
enum HopOutcome {
    Redirect(Url),
    Body {
        bytes: Vec<u8>,
        encoding: Option<String>,
    },
}

/// SSRF-resistant HTTP fetcher for feed documents.
#[derive(Debug, Clone, Default)]
pub struct FeedFetcher {
    guard: SsrfGuard,
    limits: FetchLimits,
}

impl FeedFetcher {
    /// Creates a fetcher using the system resolver.
    pub fn new(limits: FetchLimits) -> Self {
        Self::with_guard(SsrfGuard::new(), limits)
    }

    /// Creates a fetcher with a custom guard (e.g. one using a custom resolver).
    pub fn with_guard(guard: SsrfGuard, limits: FetchLimits) -> Self {
        Self { guard, limits }
    }

    pub fn limits(&self) -> &FetchLimits {
        &self.limits
    }

    /// Fetches a feed and returns its decoded text.
    ///
    /// # Errors
    ///
    /// - `FetchError::Guard` if the URL or any redirect target is rejected
    /// - `FetchError::TooManyRedirects` once the redirect budget is spent
    /// - `FetchError::HttpStatus` for non-2xx, non-redirect responses
    /// - `FetchError::TooLarge` when the body crosses the byte cap
    /// - `FetchError::DecodeFailure` for undecodable bodies
    /// - `FetchError::Timeout` when one hop exceeds its timeout
    /// - `FetchError::Network` for connection level failures
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut current = self.guard.validate_url(url)?;
        let mut redirects = 0usize;

        loop {
            debug!("Fetching {current} (hop {})", redirects + 1);
            let outcome = tokio::time::timeout(self.limits.hop_timeout, self.fetch_hop(&current))
                .await
                .map_err(|_| FetchError::Timeout(self.limits.hop_timeout))??;

            match outcome {
                HopOutcome::Redirect(next) => {
                    if redirects >= self.limits.max_redirects {
                        return Err(FetchError::TooManyRedirects(self.limits.max_redirects));
                    }
                    redirects += 1;
                    debug!("Redirect {redirects}: {current} -> {next}");
                    current = self.guard.validate_url(next.as_str())?;
                }
                HopOutcome::Body { bytes, encoding } => {
                    let received = bytes.len();
                    let limit = self.limits.max_decoded_bytes;
                    let text = tokio::task::spawn_blocking(move || {
                        decode_body(bytes, encoding.as_deref(), limit)
                    })
                    .await
                    .map_err(|e| FetchError::DecodeFailure(e.to_string()))??;

                    info!(
                        "Fetched {current}: {received} bytes on the wire, {} bytes decoded, {redirects} redirect(s)",
                        text.len()
                    );
                    return Ok(text);
                }
            }
        }
    }

    /// Performs one request against the pinned address of `url`.
    async fn fetch_hop(&self, url: &Url) -> Result<HopOutcome, FetchError> {
        let target = self.guard.pin(url.clone()).await?;
        debug!("Pinned {} to {}", url, target.addr);

        let client = init_pinned_client(&target, &self.limits.user_agent)?;
        let response = apply_feed_headers(client.get(target.url.clone()))
            .send()
            .await?;

        let status = response.status();
        if is_followed_redirect(status) {
            return match redirect_target(url, response.headers())? {
                Some(next) => Ok(HopOutcome::Redirect(next)),
                None => {
                    log::warn!("Redirect status {} for {} but no Location header", status, url);
                    Err(FetchError::HttpStatus(status.as_u16()))
                }
            };
        }

        if !status.is_success() {
            drain_body(response, self.limits.max_body_bytes).await;
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let encoding = content_encoding(response.headers());
        let bytes = read_body_with_limit(response, self.limits.max_body_bytes).await?;
        Ok(HopOutcome::Body { bytes, encoding })
    }
}
