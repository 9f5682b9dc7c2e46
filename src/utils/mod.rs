//! Small shared utilities.
//!
//! - Error message sanitization for caller-facing messages

pub mod sanitize;
