//! HTTP client initialization.
//!
//! One client is built per request hop so the guard-pinned address can be
//! installed as the only resolution for the hop's host.

use reqwest::ClientBuilder;

use crate::security::PinnedTarget;

/// Initializes an HTTP client bound to a pinned target.
///
/// Creates a `reqwest::Client` configured with:
/// - Redirects disabled (the fetcher follows and re-validates them itself)
/// - Proxies disabled (environment proxies would bypass address pinning)
/// - No idle connection pooling (the connection dies with the hop)
/// - The target's domain resolving only to the pinned address
/// - Rustls TLS backend
///
/// No automatic decompression is enabled, so the body arrives exactly as
/// sent on the wire and is decoded later by [`crate::fetch`].
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_pinned_client(
    target: &PinnedTarget,
    user_agent: &str,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .pool_max_idle_per_host(0)
        .user_agent(user_agent);

    if let Some(domain) = &target.domain {
        builder = builder.resolve(domain, target.addr);
    }

    builder.build()
}
