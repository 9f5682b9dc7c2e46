//! URL validation and SSRF protection.
//!
//! This module validates caller-supplied and redirect-supplied URLs before any
//! connection is made, blocking:
//! - Malformed URLs and URLs without a host
//! - Non-HTTP/HTTPS schemes (file://, ftp://, gopher://, ...)
//! - Localhost names
//! - Literal private/internal IP addresses

use std::net::IpAddr;

use url::Url;

use super::address::is_forbidden_ip;
use crate::config::MAX_URL_LENGTH;
use crate::error_handling::GuardError;

/// Validates that a URL is safe to fetch (SSRF protection).
///
/// This function checks:
/// - URL parses and is no longer than `MAX_URL_LENGTH`
/// - URL uses http:// or https:// scheme
/// - Host is not localhost or a `.localhost` subdomain
/// - A literal IP host is not private/reserved
///
/// Domain names are not resolved here; that happens at connection time in
/// [`super::SsrfGuard::pin`].
///
/// # Examples
///
/// ```
/// use podcast_feed::security::validate_url;
///
/// assert!(validate_url("https://example.com/feed.xml").is_ok());
/// assert!(validate_url("http://93.184.216.34/feed").is_ok());
///
/// assert!(validate_url("http://127.0.0.1/feed").is_err());
/// assert!(validate_url("http://169.254.169.254/feed").is_err());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, GuardError> {
    validate_url_with(url_str, is_forbidden_ip)
}

pub(crate) fn validate_url_with(
    url_str: &str,
    is_forbidden: impl Fn(IpAddr) -> bool,
) -> Result<Url, GuardError> {
    if url_str.len() > MAX_URL_LENGTH {
        return Err(GuardError::InvalidUrl {
            url: url_str.chars().take(50).collect::<String>() + "...",
            reason: format!("longer than {MAX_URL_LENGTH} characters"),
        });
    }

    let url = Url::parse(url_str.trim()).map_err(|e| GuardError::InvalidUrl {
        url: url_str.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(GuardError::UnsupportedScheme(scheme.to_string())),
    }

    match url.host() {
        Some(url::Host::Domain(domain)) => {
            if is_localhost_domain(domain) {
                return Err(GuardError::ForbiddenHost(domain.to_string()));
            }
        }
        Some(url::Host::Ipv4(ip)) => {
            if is_forbidden(IpAddr::V4(ip)) {
                return Err(GuardError::ForbiddenHost(ip.to_string()));
            }
        }
        Some(url::Host::Ipv6(ip)) => {
            if is_forbidden(IpAddr::V6(ip)) {
                return Err(GuardError::ForbiddenHost(ip.to_string()));
            }
        }
        None => {
            return Err(GuardError::InvalidUrl {
                url: url_str.to_string(),
                reason: "URL has no host component".to_string(),
            })
        }
    }

    Ok(url)
}

/// Checks if a domain name is a localhost variant.
fn is_localhost_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    matches!(domain.as_str(), "localhost" | "localhost.localdomain")
        || domain.ends_with(".localhost")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_public_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://feeds.example.com/podcast.rss").is_ok());
        assert!(validate_url("https://example.com:8443/feed?x=1").is_ok());
        assert!(validate_url("http://93.184.216.34/feed").is_ok());
        assert!(validate_url("http://[2001:db8::1]/feed").is_ok());
    }

    #[test]
    fn test_validate_url_private_literals() {
        for url in [
            "http://127.0.0.1/feed",
            "http://127.0.0.1:8080/feed",
            "http://10.0.0.5/feed",
            "http://169.254.169.254/feed",
            "http://172.16.0.1/feed",
            "http://192.168.1.1/feed",
            "http://100.64.0.1/feed",
            "http://0.0.0.0/feed",
            "http://[::1]/feed",
            "http://[fe80::1]/feed",
            "http://[fd00::1]/feed",
            "http://[::ffff:127.0.0.1]/feed",
        ] {
            assert!(
                matches!(validate_url(url), Err(GuardError::ForbiddenHost(_))),
                "{url} should be forbidden"
            );
        }
    }

    #[test]
    fn test_validate_url_decimal_ip_is_normalized() {
        // The URL parser turns 2130706433 into 127.0.0.1
        assert!(matches!(
            validate_url("http://2130706433/feed"),
            Err(GuardError::ForbiddenHost(_))
        ));
    }

    #[test]
    fn test_validate_url_localhost_domains() {
        for url in [
            "http://localhost/feed",
            "http://LOCALHOST:8080/feed",
            "http://localhost./feed",
            "http://localhost.localdomain/feed",
            "http://api.localhost/feed",
        ] {
            assert!(
                matches!(validate_url(url), Err(GuardError::ForbiddenHost(_))),
                "{url} should be forbidden"
            );
        }
        assert!(validate_url("http://localhost.example.com/feed").is_ok());
    }

    #[test]
    fn test_validate_url_unsafe_schemes() {
        assert_eq!(
            validate_url("file:///etc/passwd"),
            Err(GuardError::UnsupportedScheme("file".to_string()))
        );
        assert!(matches!(
            validate_url("ftp://example.com/feed"),
            Err(GuardError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_url("gopher://example.com"),
            Err(GuardError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_validate_url_invalid_urls() {
        assert!(matches!(
            validate_url("not-a-url"),
            Err(GuardError::InvalidUrl { .. })
        ));
        assert!(matches!(validate_url(""), Err(GuardError::InvalidUrl { .. })));
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            validate_url(&long),
            Err(GuardError::InvalidUrl { .. })
        ));
    }
}
