//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (redirect budget, byte caps, timeouts, page sizes)
//! - Fetch limits and CLI option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, Command, FetchLimits, LogFormat, LogLevel};
