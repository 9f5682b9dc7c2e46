//! Request boundary.
//!
//! [`FeedService`] runs one request end to end: check the caller's input,
//! fetch the feed, parse it, extract entities, and attach a caching hint.
//! Every failure leaves as a [`ServiceError`] with [`CacheHint::NoStore`].

use log::{info, warn};

use crate::config::CACHE_MAX_AGE_SECS;
use crate::error_handling::{ErrorCategory, ServiceError};
use crate::feed::{extract_episodes_page, extract_podcast, parse_feed, PageRequest};
use crate::fetch::FeedFetcher;
use crate::models::{EpisodesPage, Podcast};

/// Whether a response may be cached by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHint {
    /// Safe to cache publicly for `max_age_secs`
    Public { max_age_secs: u64 },
    /// Must not be cached
    NoStore,
}

impl CacheHint {
    /// `Cache-Control` header value for this hint.
    pub fn cache_control(&self) -> String {
        match self {
            CacheHint::Public { max_age_secs } => format!("public, max-age={max_age_secs}"),
            CacheHint::NoStore => "no-store".to_string(),
        }
    }

    fn for_entity(non_empty: bool) -> Self {
        if non_empty {
            CacheHint::Public {
                max_age_secs: CACHE_MAX_AGE_SECS,
            }
        } else {
            CacheHint::NoStore
        }
    }
}

impl ServiceError {
    /// Failed requests are never cacheable.
    pub fn cache_hint(&self) -> CacheHint {
        CacheHint::NoStore
    }
}

/// A successful response body with its caching hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse<T> {
    pub body: T,
    pub cache: CacheHint,
}

/// Fetch-and-normalize entry point.
#[derive(Debug, Clone, Default)]
pub struct FeedService {
    fetcher: FeedFetcher,
}

impl FeedService {
    pub fn new(fetcher: FeedFetcher) -> Self {
        Self { fetcher }
    }

    /// Loads the channel-level podcast entity of a feed.
    ///
    /// # Errors
    ///
    /// `BadInput` when `url` is missing or blank (nothing is fetched), otherwise
    /// the category of the fetch or parse failure.
    pub async fn podcast(&self, url: Option<&str>) -> Result<ServiceResponse<Podcast>, ServiceError> {
        let url = required_url(url)?;
        let text = self.fetch(&url).await?;

        let source = url.clone();
        let podcast = run_blocking(move || {
            let tree = parse_feed(&text)?;
            Ok(extract_podcast(&tree, &source))
        })
        .await
        .inspect_err(|e| warn!("Failed to load podcast from {url}: {e}"))?;

        info!("Loaded podcast '{}' from {url}", podcast.name);
        let cache = CacheHint::for_entity(!podcast.is_empty());
        Ok(ServiceResponse {
            body: podcast,
            cache,
        })
    }

    /// Loads one page of episodes of a feed.
    ///
    /// # Errors
    ///
    /// Same as [`FeedService::podcast`].
    pub async fn episodes(
        &self,
        url: Option<&str>,
        page: PageRequest,
    ) -> Result<ServiceResponse<EpisodesPage>, ServiceError> {
        let url = required_url(url)?;
        let text = self.fetch(&url).await?;

        let episodes = run_blocking(move || {
            let tree = parse_feed(&text)?;
            Ok(extract_episodes_page(&tree, page))
        })
        .await
        .inspect_err(|e| warn!("Failed to load episodes from {url}: {e}"))?;

        info!(
            "Loaded {} of {} episodes from {url} (offset {})",
            episodes.episodes.len(),
            episodes.total,
            page.offset
        );
        let cache = CacheHint::for_entity(!episodes.episodes.is_empty());
        Ok(ServiceResponse {
            body: episodes,
            cache,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, ServiceError> {
        self.fetcher.fetch(url).await.map_err(|e| {
            warn!("Fetch of {url} failed: {e}");
            ServiceError::from(e)
        })
    }
}

fn required_url(url: Option<&str>) -> Result<String, ServiceError> {
    match url.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(ServiceError::bad_input("Missing feed URL")),
    }
}

/// Runs CPU-bound parsing and extraction off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::new(ErrorCategory::ParseFailed, e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchLimits;
    use crate::security::SsrfGuard;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use std::time::Duration;

    const FEED: &str = r#"<rss version="2.0"><channel><title>Test Cast</title>
        <item><title>One</title><guid>1</guid></item>
        <item><title>Two</title><guid>2</guid></item>
        <item><title>Three</title><guid>3</guid></item>
      </channel></rss>"#;

    fn loopback_service() -> FeedService {
        FeedService::new(FeedFetcher::with_guard(
            SsrfGuard::new().allowing_loopback(),
            FetchLimits {
                hop_timeout: Duration::from_secs(5),
                ..FetchLimits::default()
            },
        ))
    }

    fn serve(body: &'static str) -> Server {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/feed.xml"))
                .respond_with(status_code(200).body(body)),
        );
        server
    }

    #[test]
    fn test_cache_control_values() {
        assert_eq!(
            CacheHint::Public { max_age_secs: 600 }.cache_control(),
            "public, max-age=600"
        );
        assert_eq!(CacheHint::NoStore.cache_control(), "no-store");
        assert_eq!(
            ServiceError::bad_input("x").cache_hint(),
            CacheHint::NoStore
        );
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_input() {
        let service = FeedService::default();
        for url in [None, Some(""), Some("   ")] {
            let err = service.podcast(url).await.unwrap_err();
            assert_eq!(err.category, ErrorCategory::BadInput);
            assert_eq!(err.status_code(), 400);
        }
        let err = service
            .episodes(None, PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::BadInput);
    }

    #[tokio::test]
    async fn test_private_target_is_ssrf_rejected() {
        let err = FeedService::default()
            .podcast(Some("http://10.0.0.5/feed"))
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::SsrfRejected);
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.cache_hint(), CacheHint::NoStore);
    }

    #[tokio::test]
    async fn test_podcast_end_to_end() {
        let server = serve(FEED);
        let response = loopback_service()
            .podcast(Some(server.url_str("/feed.xml").as_str()))
            .await
            .unwrap();
        assert_eq!(response.body.name, "Test Cast");
        assert_eq!(response.body.rss, server.url_str("/feed.xml"));
        assert_eq!(response.cache, CacheHint::Public { max_age_secs: 600 });
    }

    #[tokio::test]
    async fn test_episodes_pages_and_cache_hint() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/feed.xml"))
                .times(2)
                .respond_with(status_code(200).body(FEED)),
        );
        let service = loopback_service();
        let url = server.url_str("/feed.xml");

        let page = service
            .episodes(Some(url.as_str()), PageRequest::new(1, Some(1)))
            .await
            .unwrap();
        assert_eq!(page.body.total, 3);
        assert_eq!(page.body.episodes[0].title, "Two");
        assert_eq!(page.body.next_cursor, Some(2));
        assert!(matches!(page.cache, CacheHint::Public { .. }));

        let empty = service
            .episodes(Some(url.as_str()), PageRequest::new(10, None))
            .await
            .unwrap();
        assert_eq!(empty.body.total, 3);
        assert!(empty.body.episodes.is_empty());
        assert_eq!(empty.cache, CacheHint::NoStore);
    }

    #[tokio::test]
    async fn test_malformed_feed_is_parse_failure() {
        let server = serve("<rss><channel><title>broken</rss>");
        let err = loopback_service()
            .podcast(Some(server.url_str("/feed.xml").as_str()))
            .await
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::ParseFailed);
        assert_eq!(err.status_code(), 502);
    }
}
