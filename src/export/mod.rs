//! Intermediate file output.
//!
//! Serializes the accepted batch to the pipe-delimited file that the bulk
//! loader streams into PostgreSQL.

mod delimited;

pub use delimited::write_batch;
