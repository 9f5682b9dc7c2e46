//! Service boundary tests: input checking, SSRF rejection and error
//! classification as seen by a caller.
//!
//! Every rejected target here is refused before a connection is attempted, so
//! the tests run without network access.

use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use futures::future::BoxFuture;
use podcast_feed::error_handling::{categorize_guard_error, GuardError};
use podcast_feed::security::{is_forbidden_ip, validate_url, HostResolver};
use podcast_feed::{
    CacheHint, ErrorCategory, FeedFetcher, FeedService, FetchLimits, PageRequest, ServiceError,
    SsrfGuard,
};
use strum::IntoEnumIterator;

/// Resolver answering every name with the same fixed addresses.
#[derive(Debug)]
struct FixedResolver(Vec<IpAddr>);

impl HostResolver for FixedResolver {
    fn lookup<'a>(&'a self, _host: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>> {
        let answer = self.0.clone();
        Box::pin(async move { Ok(answer) })
    }
}

fn service_resolving_to(addrs: &[IpAddr]) -> FeedService {
    let guard = SsrfGuard::with_resolver(Arc::new(FixedResolver(addrs.to_vec())));
    FeedService::new(FeedFetcher::with_guard(guard, FetchLimits::default()))
}

fn assert_rejected(err: &ServiceError) {
    assert_eq!(err.category, ErrorCategory::SsrfRejected, "{err}");
    assert_eq!(err.status_code(), 502);
    assert_eq!(err.cache_hint(), CacheHint::NoStore);
}

#[tokio::test]
async fn test_missing_url_never_fetches() {
    let service = FeedService::default();
    for url in [None, Some(""), Some("  \t ")] {
        let err = service.podcast(url).await.unwrap_err();
        assert_eq!(err.category, ErrorCategory::BadInput);
        assert_eq!(err.status_code(), 400);

        let err = service
            .episodes(url, PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::BadInput);
    }
}

#[tokio::test]
async fn test_forbidden_literal_targets() {
    let service = FeedService::default();
    for url in [
        "http://127.0.0.1/feed",
        "http://10.0.0.5/feed",
        "http://169.254.169.254/latest/meta-data/",
        "http://192.168.1.1/rss",
        "http://[::1]/feed",
        "http://localhost:8080/feed",
        "http://podcasts.localhost/feed",
    ] {
        let err = service.podcast(Some(url)).await.unwrap_err();
        assert_rejected(&err);
    }
}

#[tokio::test]
async fn test_non_http_schemes_rejected() {
    let service = FeedService::default();
    for url in [
        "file:///etc/passwd",
        "ftp://feeds.example.com/show.xml",
        "gopher://example.com/",
    ] {
        let err = service
            .episodes(Some(url), PageRequest::default())
            .await
            .unwrap_err();
        assert_rejected(&err);
    }
}

#[tokio::test]
async fn test_private_only_dns_answer_rejected() {
    let service = service_resolving_to(&[
        IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)),
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        IpAddr::V4(Ipv4Addr::new(169, 254, 169, 254)),
    ]);
    let err = service
        .podcast(Some("https://rebind.example.com/feed.xml"))
        .await
        .unwrap_err();
    assert_rejected(&err);
    assert!(err.message.contains("rebind.example.com"));
}

#[tokio::test]
async fn test_empty_dns_answer_is_unreachable() {
    let service = service_resolving_to(&[]);
    let err = service
        .podcast(Some("https://nowhere.example.com/feed.xml"))
        .await
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::UpstreamUnreachable);
    assert_eq!(err.status_code(), 502);
}

#[test]
fn test_public_targets_pass_static_validation() {
    for url in [
        "https://feeds.example.com/show.xml",
        "http://93.184.216.34/feed",
        "https://[2606:4700::1111]/feed",
    ] {
        assert!(validate_url(url).is_ok(), "rejected {url}");
    }
    assert!(!is_forbidden_ip(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))));
    assert!(is_forbidden_ip(IpAddr::V4(Ipv4Addr::new(100, 64, 0, 1))));
}

#[test]
fn test_guard_rejections_classify_as_ssrf() {
    let errors = [
        GuardError::UnsupportedScheme("file".to_string()),
        GuardError::ForbiddenHost("localhost".to_string()),
        GuardError::ForbiddenAddress {
            host: "internal.example".to_string(),
            address: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
        },
    ];
    for error in &errors {
        assert_eq!(categorize_guard_error(error), ErrorCategory::SsrfRejected);
    }
}

#[test]
fn test_only_bad_input_maps_to_client_error() {
    for category in ErrorCategory::iter() {
        let expected = if category == ErrorCategory::BadInput {
            400
        } else {
            502
        };
        assert_eq!(category.status_code(), expected, "{category}");
        assert_eq!(ServiceError::new(category, "x").cache_hint(), CacheHint::NoStore);
    }
}

#[test]
fn test_error_messages_are_single_line() {
    let err = ServiceError::new(
        ErrorCategory::UpstreamUnreachable,
        "connect failed\r\nX-Injected: yes\u{0}",
    );
    assert!(!err.message.contains('\n'));
    assert!(!err.message.contains('\r'));
    assert!(!err.message.contains('\u{0}'));
    assert!(err.to_string().starts_with("Upstream unreachable: "));
}

#[test]
fn test_page_limits_are_clamped() {
    assert_eq!(PageRequest::default(), PageRequest::new(0, None));
    assert_eq!(PageRequest::new(3, Some(0)).limit, 1);
    assert_eq!(PageRequest::new(3, Some(500)).limit, 50);
    assert_eq!(PageRequest::new(3, Some(20)).limit, 20);
}
