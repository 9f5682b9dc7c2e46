//! Application initialization and resource setup.
//!
//! - Logger setup for the binary
//! - Per-hop HTTP client construction for the fetcher

mod client;
mod logger;

pub use client::init_pinned_client;
pub use logger::init_logger_with;
