//! SSRF-safe address resolution and pinning.
//!
//! [`SsrfGuard::pin`] resolves a validated URL's host to *all* of its
//! addresses, keeps the first public one, and returns it as a
//! [`PinnedTarget`]. The fetcher connects to exactly that address, so a second
//! DNS answer (DNS rebinding) can never redirect the connection to a private
//! network between validation and connect.

use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use futures::future::BoxFuture;
use log::debug;
use url::{Host, Url};

use super::address::is_forbidden_ip;
use super::url_validation::validate_url_with;
use crate::error_handling::GuardError;

/// Hostname to address lookup.
///
/// Implementations must return every address the name resolves to, in the
/// resolver's preference order.
pub trait HostResolver: Send + Sync + fmt::Debug {
    fn lookup<'a>(&'a self, host: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>>;
}

/// Resolver backed by the system resolver (`tokio::net::lookup_host`).
#[derive(Debug, Clone, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn lookup<'a>(&'a self, host: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>> {
        Box::pin(async move {
            let addrs = tokio::net::lookup_host((host, 0)).await?;
            let mut ips: Vec<IpAddr> = Vec::new();
            for addr in addrs {
                if !ips.contains(&addr.ip()) {
                    ips.push(addr.ip());
                }
            }
            Ok(ips)
        })
    }
}

/// A validated URL together with the single address the connection must use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedTarget {
    pub url: Url,
    /// Domain to override in the HTTP client; `None` when the host is a literal IP
    pub domain: Option<String>,
    pub addr: SocketAddr,
}

/// Validates URLs and resolves their hosts to public addresses only.
#[derive(Debug, Clone)]
pub struct SsrfGuard {
    resolver: Arc<dyn HostResolver>,
    allow_loopback: bool,
}

impl Default for SsrfGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SsrfGuard {
    /// Creates a guard using the system resolver.
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(SystemResolver))
    }

    /// Creates a guard using a custom resolver.
    pub fn with_resolver(resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            resolver,
            allow_loopback: false,
        }
    }

    /// Admits loopback addresses so tests can reach servers bound to 127.0.0.1.
    #[cfg(test)]
    pub(crate) fn allowing_loopback(mut self) -> Self {
        self.allow_loopback = true;
        self
    }

    fn is_forbidden(&self, ip: IpAddr) -> bool {
        if self.allow_loopback && ip.is_loopback() {
            return false;
        }
        is_forbidden_ip(ip)
    }

    /// Validates a URL string (scheme, host, literal IP ranges).
    pub fn validate_url(&self, url_str: &str) -> Result<Url, GuardError> {
        validate_url_with(url_str, |ip| self.is_forbidden(ip))
    }

    /// Resolves `hostname` and returns the first address that is not private/reserved.
    ///
    /// # Errors
    ///
    /// - `GuardError::DnsFailure` if the lookup fails or returns nothing
    /// - `GuardError::ForbiddenAddress` if every returned address is forbidden
    pub async fn resolve_public_address(&self, hostname: &str) -> Result<IpAddr, GuardError> {
        let addrs = self
            .resolver
            .lookup(hostname)
            .await
            .map_err(|e| GuardError::DnsFailure {
                host: hostname.to_string(),
                message: e.to_string(),
            })?;

        let first = *addrs.first().ok_or_else(|| GuardError::DnsFailure {
            host: hostname.to_string(),
            message: "no addresses returned".to_string(),
        })?;

        match addrs.iter().find(|ip| !self.is_forbidden(**ip)) {
            Some(ip) => {
                debug!("Resolved {hostname} to {ip} ({} candidates)", addrs.len());
                Ok(*ip)
            }
            None => Err(GuardError::ForbiddenAddress {
                host: hostname.to_string(),
                address: first,
            }),
        }
    }

    /// Pins a validated URL to the public address the connection will use.
    ///
    /// Literal IP hosts are classified immediately; domain names are resolved
    /// through [`Self::resolve_public_address`].
    pub async fn pin(&self, url: Url) -> Result<PinnedTarget, GuardError> {
        let port = url
            .port_or_known_default()
            .ok_or_else(|| GuardError::InvalidUrl {
                url: url.to_string(),
                reason: "no port for scheme".to_string(),
            })?;

        let (domain, ip) = match url.host() {
            Some(Host::Ipv4(ip)) => (None, IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => (None, IpAddr::V6(ip)),
            Some(Host::Domain(domain)) => {
                let ip = self.resolve_public_address(domain).await?;
                (Some(domain.to_string()), ip)
            }
            None => {
                return Err(GuardError::InvalidUrl {
                    url: url.to_string(),
                    reason: "URL has no host component".to_string(),
                })
            }
        };

        if self.is_forbidden(ip) {
            return Err(GuardError::ForbiddenHost(ip.to_string()));
        }

        Ok(PinnedTarget {
            url,
            domain,
            addr: SocketAddr::new(ip, port),
        })
    }
}
