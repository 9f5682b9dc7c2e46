//! Publish date parsing.
//!
//! Feeds are supposed to carry RFC 2822 (RSS) or RFC 3339 (Atom) dates. Many
//! don't, so a handful of common deviations are accepted as well. Dates
//! without a zone are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Zone abbreviations seen in the wild that RFC 2822 does not define.
const EXTRA_ZONES: &[(&str, &str)] = &[
    ("BST", "+0100"),
    ("CET", "+0100"),
    ("CEST", "+0200"),
    ("EET", "+0200"),
    ("EEST", "+0300"),
    ("IST", "+0530"),
    ("JST", "+0900"),
    ("AEST", "+1000"),
    ("AEDT", "+1100"),
    ("UTC", "+0000"),
    ("Z", "+0000"),
];

const ZONED_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S %z",
    "%a, %d %B %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
    "%d %B %Y %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M %z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%a, %d %b %Y", "%B %d, %Y"];

/// Parses a feed date into epoch milliseconds.
///
/// Returns `None` for anything unparseable; never panics.
pub fn parse_date(raw: &str) -> Option<i64> {
    let value = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return None;
    }

    let value = replace_zone_abbreviation(&value);
    if let Ok(dt) = DateTime::parse_from_rfc2822(&value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Some(dt.timestamp_millis());
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&value, format) {
            return Some(dt.timestamp_millis());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&value, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&value, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// Swaps a trailing non-standard zone abbreviation for its numeric offset.
fn replace_zone_abbreviation(value: &str) -> String {
    if let Some((head, zone)) = value.rsplit_once(' ') {
        if let Some((_, offset)) = EXTRA_ZONES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        {
            return format!("{head} {offset}");
        }
    }
    value.to_string()
}
