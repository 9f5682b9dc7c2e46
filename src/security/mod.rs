//! SSRF guard.
//!
//! Every URL the fetcher touches (the caller's URL and each redirect target)
//! passes through this module twice:
//! - statically, via [`validate_url`] (scheme, localhost names, literal IPs)
//! - at connection time, via [`SsrfGuard::pin`] (DNS answers, address pinning)

mod address;
mod safe_resolver;
mod url_validation;

pub use address::is_forbidden_ip;
pub use safe_resolver::{HostResolver, PinnedTarget, SsrfGuard, SystemResolver};
pub use url_validation::validate_url;

#[cfg(test)]
pub(crate) use safe_resolver::tests::StaticResolver;
