//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, retry timing, pool sizing)
//! - The library `Config` and the CLI `Opt` parser

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigError, LogFormat, LogLevel, Opt};
