//! Error type definitions.
//!
//! This module defines all error types used throughout the pipeline, plus the
//! `Rejection` value returned for rows that fail validation.

use std::path::PathBuf;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Invalid configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `PG_PORT` is set but is not a port number.
    #[error("PG_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    /// Chunk size of zero would never make progress.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    /// No destination table given.
    #[error("destination table name is empty")]
    EmptyTable,

    /// Output path is the input path.
    #[error("output path would overwrite the input file: {}", .0.display())]
    OutputOverwritesInput(PathBuf),
}

/// Error types for destination database operations.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The connection was not established within the configured bound.
    #[error("Timed out after {0}s connecting to PostgreSQL")]
    ConnectTimeout(u64),

    /// The connection attempt failed.
    #[error("Failed to connect to PostgreSQL")]
    Connect(#[source] sqlx::Error),

    /// The server refused to start the COPY.
    #[error("COPY command rejected: {query}")]
    CopyStart {
        /// The rendered COPY statement
        query: String,
        #[source]
        source: sqlx::Error,
    },

    /// Reading the intermediate file failed mid-stream.
    #[error("Failed to read intermediate file during COPY")]
    SourceRead(#[source] std::io::Error),

    /// Forwarding a chunk to the server failed.
    #[error("Failed to send COPY data after {bytes_sent} bytes")]
    Send {
        /// Bytes accepted before the failure
        bytes_sent: u64,
        #[source]
        source: sqlx::Error,
    },

    /// The server rejected the data when the COPY was completed.
    #[error("COPY failed to complete")]
    Finish(#[source] sqlx::Error),

    /// A statement outside the COPY (e.g. TRUNCATE) failed.
    #[error("SQL statement failed")]
    SqlError(#[from] sqlx::Error),
}

/// Top-level pipeline errors.
///
/// Every unrecovered fault from a stage is converted into one of these and
/// aborts the remainder of the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Opening, reading, or writing a file failed.
    #[error("IO error on {}", path.display())]
    Io {
        /// File the operation was performed on
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited-record parser could not decode a row or write a record.
    #[error("CSV error on {}", path.display())]
    Csv {
        /// File the operation was performed on
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No record survived transformation.
    #[error("No valid records to write ({rejected} rows rejected)")]
    EmptyBatch {
        /// Rows dropped by the transformer
        rejected: usize,
    },

    /// The destination rejected the load or the connection failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Stable short name of the fault kind, for monitoring.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Io { .. } | PipelineError::Csv { .. } => "io",
            PipelineError::EmptyBatch { .. } => "empty_batch",
            PipelineError::Load(_) => "load",
            PipelineError::Config(_) => "config",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        PipelineError::Csv {
            path: path.into(),
            source,
        }
    }
}

/// A row dropped by the transformer.
///
/// Rejection is an expected outcome, so it is returned as a value and never
/// propagated as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: invalid {field} {}; removing row", display_value(.value))]
pub struct Rejection {
    /// 1-based line number in the input file
    pub line: u64,
    /// Name of the offending field
    pub field: &'static str,
    /// Raw value, or `None` if the row had no such column
    pub value: Option<String>,
}

/// Renders `err` followed by each of its sources, separated by `: `.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn display_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "(missing)".to_string(),
    }
}
