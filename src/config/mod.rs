//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (file schemas, delimiters, timeouts)
//! - CLI option types and parsing
//! - Environment-sourced database settings

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, IpAddressSource, LogFormat, LogLevel, Opt, PgConfig};
