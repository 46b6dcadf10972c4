// Shared test helpers for input files and pipeline configuration.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};

use user_etl::Config;

/// Header line of the input file format.
#[allow(dead_code)] // Used by other test files
pub const INPUT_HEADER: &str = "id,first_name,last_name,email,gender,ip_address";

/// Writes `rows` under the standard header to `dir/users.csv` and returns its path.
#[allow(dead_code)]
pub fn write_input(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("users.csv");
    let mut content = String::from(INPUT_HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).expect("Failed to write input file");
    path
}

/// A configuration that reads `input`, writes into `dir`, and skips the database load.
#[allow(dead_code)]
pub fn offline_config(dir: &Path, input: PathBuf) -> Config {
    Config {
        input,
        output: dir.join("out").join("transformed_file.csv"),
        load: false,
        ..Default::default()
    }
}
