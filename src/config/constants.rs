//! Configuration constants.
//!
//! This module defines the fixed file schemas, delimiters, and operational
//! defaults used throughout the pipeline.

use std::time::Duration;

/// Columns of the input file, in file order.
pub const INPUT_FIELDS: [&str; 6] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "gender",
    "ip_address",
];

/// Columns of the intermediate file and the destination table, in load order.
pub const OUTPUT_FIELDS: [&str; 7] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "gender",
    "ip_address",
    "full_name",
];

/// Field delimiter of the input file
pub const INPUT_DELIMITER: u8 = b',';
/// Field delimiter of the intermediate file (must differ from the input delimiter)
pub const OUTPUT_DELIMITER: u8 = b'|';

pub const DEFAULT_INPUT_PATH: &str = "./data/SRDataEngineerChallenge_DATASET.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./data/transformed_file.csv";
pub const DEFAULT_TABLE: &str = "user_info.\"user\"";

/// Bytes read from the intermediate file per COPY chunk.
///
/// The value is a tunable buffer size; what matters is that the loader never
/// holds more than one chunk of the file at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Connection-establishment bound for the destination database.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default PostgreSQL port when `PG_PORT` is unset
pub const DEFAULT_PG_PORT: u16 = 5432;

// Environment variables read once at startup
pub const ENV_PG_HOSTNAME: &str = "PG_HOSTNAME";
pub const ENV_PG_PORT: &str = "PG_PORT";
pub const ENV_PG_NAME: &str = "PG_NAME";
pub const ENV_PG_APP_NAME: &str = "PG_APP_NAME";
pub const ENV_PG_USER: &str = "PG_USER";
pub const ENV_PG_PASSWORD: &str = "PG_PASSWORD";
