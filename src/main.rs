//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `podcast_feed` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - JSON output and exit codes
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use podcast_feed::config::{Cli, Command};
use podcast_feed::initialization::init_logger_with;
use podcast_feed::{ErrorCategory, FeedFetcher, FeedService, PageRequest, ServiceError};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let service = FeedService::new(FeedFetcher::new(cli.fetch_limits()));

    let outcome = match &cli.command {
        Command::Podcast { url } => service
            .podcast(Some(url.as_str()))
            .await
            .map(|response| (to_json(&response.body), response.cache)),
        Command::Episodes { url, offset, limit } => service
            .episodes(Some(url.as_str()), PageRequest::new(*offset, *limit))
            .await
            .map(|response| (to_json(&response.body), response.cache)),
    };

    match outcome {
        Ok((json, cache)) => {
            let json = json.context("Failed to serialize response")?;
            log::debug!("Cache-Control: {}", cache.cache_control());
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            eprintln!("podcast_feed error: {}", e);
            process::exit(exit_code(&e));
        }
    }
}

fn to_json<T: Serialize>(body: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(body)
}

fn exit_code(error: &ServiceError) -> i32 {
    match error.category {
        ErrorCategory::BadInput => 2,
        _ => 1,
    }
}
