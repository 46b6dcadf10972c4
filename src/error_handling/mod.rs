//! Error handling.
//!
//! This module provides the error taxonomy of the pipeline:
//! - **Rejections**: a single row failed validation; recovered by dropping it
//! - **IO errors**: a file could not be opened, read, or written
//! - **Load errors**: the destination refused the stream or the connection dropped
//! - **Empty batch**: nothing survived transformation
//!
//! Everything except a rejection aborts the run and reaches the driver.

mod types;

// Re-export public API
pub use types::{
    error_chain, ConfigError, InitializationError, LoadError, PipelineError, Rejection,
};
