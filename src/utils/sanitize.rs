//! Utilities for sanitizing caller-facing error messages.
//!
//! Removes control characters and collapses line breaks so an error message
//! is a single readable line, and caps its length.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Sanitizes an error message by removing control characters.
///
/// Newlines, tabs and carriage returns become a single space; every other
/// control character (0x00-0x1F, 0x7F) is dropped.
///
/// # Arguments
///
/// * `message` - The error message to sanitize
///
/// # Returns
///
/// A single-line version of the message with control characters removed.
pub fn sanitize_error_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\n' | '\r' | '\t' => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Sanitizes and truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// Truncation happens on a character boundary and appends an ellipsis.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);

    if sanitized.chars().count() > MAX_ERROR_MESSAGE_LENGTH {
        let truncated: String = sanitized.chars().take(MAX_ERROR_MESSAGE_LENGTH).collect();
        format!("{truncated}...")
    } else {
        sanitized
    }
}
