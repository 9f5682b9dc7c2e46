//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and for configuring the fetcher programmatically.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_USER_AGENT, HOP_TIMEOUT, MAX_DECODED_BODY_SIZE, MAX_REDIRECTS, MAX_RESPONSE_BODY_SIZE,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON lines for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Limits applied to every fetch.
///
/// The defaults come from [`crate::config`] constants; tests and embedders may
/// tighten them.
#[derive(Debug, Clone)]
pub struct FetchLimits {
    /// Redirect hops followed before failing with `TooManyRedirects`
    pub max_redirects: usize,
    /// Byte cap on the raw (still encoded) response body
    pub max_body_bytes: usize,
    /// Byte cap on the decoded response body
    pub max_decoded_bytes: usize,
    /// Wall-clock timeout of a single hop
    pub hop_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_redirects: MAX_REDIRECTS,
            max_body_bytes: MAX_RESPONSE_BODY_SIZE,
            max_decoded_bytes: MAX_DECODED_BODY_SIZE,
            hop_timeout: HOP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Command-line interface of the `podcast_feed` binary.
#[derive(Debug, Parser)]
#[command(name = "podcast_feed", version, about)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value = "info", env = "PODCAST_FEED_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain", env = "PODCAST_FEED_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Per-hop request timeout in seconds
    #[arg(long, default_value_t = HOP_TIMEOUT.as_secs(), env = "PODCAST_FEED_TIMEOUT_SECONDS")]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, env = "PODCAST_FEED_USER_AGENT")]
    pub user_agent: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed by the binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a feed and print the channel-level podcast entity
    Podcast {
        /// Feed URL
        url: String,
    },
    /// Fetch a feed and print one page of episodes
    Episodes {
        /// Feed URL
        url: String,
        /// Zero-based position of the first episode
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Page size (default 10, at most 50)
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// Builds the fetch limits selected on the command line.
    pub fn fetch_limits(&self) -> FetchLimits {
        FetchLimits {
            hop_timeout: Duration::from_secs(self.timeout_seconds),
            user_agent: self.user_agent.clone(),
            ..FetchLimits::default()
        }
    }
}
