//! user_etl library: normalize a user-record file and bulk-load it into PostgreSQL
//!
//! The pipeline reads a comma-delimited file of user rows, rejects rows whose
//! `id` is not an integer, strips every string field, derives `full_name`,
//! writes a pipe-delimited intermediate file, and streams that file into a
//! PostgreSQL table with `COPY ... FROM STDIN`.
//!
//! ```text
//! users.csv ──▶ RowReader ──▶ transform ──▶ write_batch ──▶ load_file ──▶ COPY
//!              (reader)      (transform)    (export)        (storage)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use user_etl::{drive, Config, PgConfig};
//! use std::path::PathBuf;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: PathBuf::from("data/users.csv"),
//!     output: PathBuf::from("data/transformed_file.csv"),
//!     pg: PgConfig::from_env()?,
//!     ..Default::default()
//! };
//!
//! let run = drive(&config).await;
//! if let Ok(report) = &run.result {
//!     println!("Loaded {:?} rows", report.rows_loaded);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Database access goes through sqlx and needs a Tokio runtime. The pipeline
//! itself is strictly sequential, so a current-thread runtime is enough.

pub mod config;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod models;
pub mod reader;
pub mod run;
pub mod storage;
pub mod transform;

// Re-export public API
pub use config::{Config, IpAddressSource, LogFormat, LogLevel, Opt, PgConfig};
pub use error_handling::{LoadError, PipelineError, Rejection};
pub use models::{RawRecord, RecordBatch, TransformedRecord};
pub use run::{drive, run_pipeline, PipelineReport, PipelineRun};
pub use transform::{transform, transform_all, Outcome};
