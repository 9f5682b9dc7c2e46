//! Logger initialization for the `podcast_feed` binary.
//!
//! Library code only emits `log` records; installing a logger is left to the
//! binary (or to whoever embeds the library).

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter};
use serde_json::json;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies that are chatty at debug level, with the level they are capped at.
const NOISY_DEPENDENCIES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("h2", LevelFilter::Info),
    ("rustls", LevelFilter::Warn),
];

/// Installs an `env_logger` writing to stderr in the requested format.
///
/// `RUST_LOG` is read first; `level` then applies to this crate and as the
/// global default, with a few noisy dependencies capped below it.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=podcast_feed::fetch=trace podcast_feed --log-format json podcast https://example.com/feed.xml
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    for (module, cap) in NOISY_DEPENDENCIES {
        builder.filter_module(module, (*cap).min(level));
    }
    builder.filter_module("podcast_feed", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = json_line(
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    &record.args().to_string(),
                );
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {:>5} {} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    colored_level(record.level()),
                    short_target(record.target()).cyan(),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Module path relative to this crate (`fetch::body` rather than
/// `podcast_feed::fetch::body`); other targets are left alone.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("podcast_feed::")
        .unwrap_or(target)
}

fn colored_level(level: Level) -> ColoredString {
    let label = level.to_string();
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

/// One JSON log line: `{"ts":..,"level":..,"target":..,"msg":..}`.
fn json_line(ts_millis: i64, level: Level, target: &str, message: &str) -> String {
    json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": short_target(target),
        "msg": message,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("podcast_feed::fetch::body"), "fetch::body");
        assert_eq!(short_target("podcast_feed"), "podcast_feed");
        assert_eq!(short_target("reqwest::connect"), "reqwest::connect");
    }

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(
            1_700_000_000_000,
            Level::Warn,
            "podcast_feed::service",
            "Fetch of \"http://x\" failed\nsecond line",
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["ts"], 1_700_000_000_000_i64);
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "service");
        assert_eq!(value["msg"], "Fetch of \"http://x\" failed\nsecond line");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_init_logger_second_call_is_error_not_panic() {
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
