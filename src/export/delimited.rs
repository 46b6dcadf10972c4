//! Pipe-delimited intermediate file.
//!
//! One header line of field names, then one line per record. Quoting follows
//! the column type: the header and every string column are double quoted,
//! the integer `id` never is. A string that looks like a number (`123`,
//! `NaN`) is still quoted.

use std::fs::File;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use log::info;

use crate::config::{OUTPUT_DELIMITER, OUTPUT_FIELDS};
use crate::error_handling::PipelineError;
use crate::models::{RecordBatch, TransformedRecord};

/// Wraps `value` in double quotes, doubling any embedded quote.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Fields of `record` in column order, already quoted for their type.
fn row_fields(record: &TransformedRecord) -> [String; 7] {
    [
        record.id.to_string(),
        quoted(&record.first_name),
        quoted(&record.last_name),
        quoted(&record.email),
        quoted(&record.gender),
        quoted(&record.ip_address),
        quoted(&record.full_name),
    ]
}

/// Writes `batch` to `path`, replacing any existing file.
///
/// The file is flushed and closed before this returns, so it can be reopened
/// for reading immediately.
///
/// # Returns
///
/// Returns the number of records written.
///
/// # Errors
///
/// - `PipelineError::EmptyBatch` if `batch` has no records; no file is created
/// - `PipelineError::Io` / `PipelineError::Csv` if creating or writing fails.
///   A partially written file is left in place.
pub fn write_batch(path: &Path, batch: &RecordBatch) -> Result<usize, PipelineError> {
    if batch.is_empty() {
        return Err(PipelineError::EmptyBatch {
            rejected: batch.rejected(),
        });
    }

    info!("Writing transformed file {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;

    // Fields arrive pre-quoted, so the writer itself must never add quotes.
    let mut writer = WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(file);

    writer
        .write_record(OUTPUT_FIELDS.iter().map(|f| quoted(f)))
        .map_err(|e| PipelineError::csv(path, e))?;
    for record in &batch.records {
        writer
            .write_record(&row_fields(record))
            .map_err(|e| PipelineError::csv(path, e))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| PipelineError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| PipelineError::io(path, e))?;

    info!("Finished writing transformed file ({} rows)", batch.len());
    Ok(batch.len())
}
