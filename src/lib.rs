//! podcast_feed library: safe podcast feed fetching and normalization
//!
//! This library fetches a caller-supplied RSS/Atom feed URL behind an SSRF
//! guard (DNS pinning, bounded redirects, byte caps, content decoding) and
//! turns the feed into normalized podcast and episode entities with sanitized
//! HTML, plain text, stable episode IDs and timestamp markup.
//!
//! # Example
//!
//! ```no_run
//! use podcast_feed::{FeedService, PageRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FeedService::default();
//!
//! let podcast = service
//!     .podcast(Some("https://feeds.example.com/show.xml"))
//!     .await?;
//! println!("{} by {}", podcast.body.name, podcast.body.author);
//!
//! let page = service
//!     .episodes(Some("https://feeds.example.com/show.xml"), PageRequest::new(0, Some(20)))
//!     .await?;
//! println!("{} of {} episodes, Cache-Control: {}",
//!          page.body.episodes.len(), page.body.total, page.cache.cache_control());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod content;
pub mod error_handling;
pub mod feed;
pub mod fetch;
pub mod identity;
pub mod initialization;
pub mod models;
pub mod security;
pub mod service;
mod utils;

// Re-export public API
pub use config::{FetchLimits, LogFormat, LogLevel};
pub use error_handling::{ErrorCategory, ServiceError};
pub use feed::PageRequest;
pub use fetch::FeedFetcher;
pub use models::{Episode, EpisodesPage, Podcast};
pub use security::SsrfGuard;
pub use service::{CacheHint, FeedService, ServiceResponse};
