//! Destination database operations.
//!
//! - [`connection`]: opens the single PostgreSQL connection for a run
//! - [`copy`]: bounded-chunk streaming of the intermediate file via `COPY`

pub mod connection;
pub mod copy;

// Re-export commonly used items
pub use connection::{connect, connect_options};
pub use copy::{copy_from_reader, load_file, truncate_table, CopyCommand, CopySink, CopyStats};
