//! Application initialization.
//!
//! The driver owns the logger lifecycle: `init_logger_with` once at start,
//! `shutdown_logger` once before exit.

mod logger;

// Re-export public API
pub use logger::{init_logger_with, shutdown_logger};
