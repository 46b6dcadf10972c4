//! Input file reading.
//!
//! Parses a comma-delimited file into a lazy, single-pass sequence of
//! [`RawRecord`]s keyed by an explicit field list. The first line is always
//! skipped as a header; its content is not interpreted.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter};
use log::debug;

use crate::config::INPUT_DELIMITER;
use crate::error_handling::PipelineError;
use crate::models::RawRecord;

/// Iterator over the data rows of an input file.
pub struct RowReader {
    path: PathBuf,
    fields: Vec<String>,
    records: StringRecordsIntoIter<File>,
}

impl RowReader {
    /// Opens `path` with the default input delimiter.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if the file cannot be opened.
    pub fn open<F: AsRef<str>>(path: &Path, fields: &[F]) -> Result<Self, PipelineError> {
        Self::open_with_delimiter(path, fields, INPUT_DELIMITER)
    }

    /// Opens `path`, splitting fields on `delimiter`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if the file cannot be opened.
    pub fn open_with_delimiter<F: AsRef<str>>(
        path: &Path,
        fields: &[F],
        delimiter: u8,
    ) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
        debug!("Opened input file {}", path.display());

        // Field count is deliberately not validated; RawRecord pads or truncates.
        let reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        Ok(Self {
            path: path.to_path_buf(),
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            records: reader.into_records(),
        })
    }
}

impl Iterator for RowReader {
    type Item = Result<RawRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(PipelineError::csv(&self.path, e))),
        };
        let line = record.position().map_or(0, csv::Position::line);
        Some(Ok(RawRecord::new(line, &self.fields, record.iter())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INPUT_FIELDS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn input_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_skips_header_and_keys_by_declared_fields() {
        let file = input_file(
            "whatever,the,header,says,is,ignored\n1,John , Doe ,j@x.com,M,1.2.3.4\n",
        );
        let rows: Vec<RawRecord> = RowReader::open(file.path(), &INPUT_FIELDS)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line(), 2);
        assert_eq!(rows[0].get("id"), Some("1"));
        assert_eq!(rows[0].get("first_name"), Some("John "));
        assert_eq!(rows[0].get("last_name"), Some(" Doe "));
        assert_eq!(rows[0].get("ip_address"), Some("1.2.3.4"));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let file = input_file("id,first_name,last_name,email,gender,ip_address\n");
        let mut reader = RowReader::open(file.path(), &INPUT_FIELDS).unwrap();
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_short_and_long_rows_are_not_errors() {
        let file = input_file("h\n1,Ada\n2,Alan,Turing,a@t.org,M,10.0.0.1,surplus\n");
        let rows: Vec<RawRecord> = RowReader::open(file.path(), &INPUT_FIELDS)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("first_name"), Some("Ada"));
        assert_eq!(rows[0].get("email"), None);
        assert_eq!(rows[1].get("ip_address"), Some("10.0.0.1"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RowReader::open(Path::new("/nonexistent/users.csv"), &INPUT_FIELDS)
            .err()
            .expect("opening a missing file should fail");
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("/nonexistent/users.csv"));
    }

    #[test]
    fn test_quoted_fields_keep_embedded_delimiters() {
        let file = input_file("h\n3,\"Smith, Jr.\",Bob,b@x.com,M,1.1.1.1\n");
        let row = RowReader::open(file.path(), &INPUT_FIELDS)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(row.get("first_name"), Some("Smith, Jr."));
    }
}
