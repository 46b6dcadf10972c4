//! Record types flowing through the pipeline.

use serde::{Deserialize, Serialize};

use crate::error_handling::Rejection;

/// One input row, keyed by the declared field list.
///
/// Values are exactly as read from the file. A declared field with no
/// corresponding column (short row) is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    line: u64,
    entries: Vec<(String, Option<String>)>,
}

impl RawRecord {
    /// Pairs `fields` with `values` positionally, padding with `None` and
    /// dropping surplus values.
    pub fn new<F, V>(line: u64, fields: &[F], values: V) -> Self
    where
        F: AsRef<str>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let mut values = values.into_iter();
        let entries = fields
            .iter()
            .map(|f| (f.as_ref().to_string(), values.next().map(Into::into)))
            .collect();
        Self { line, entries }
    }

    /// 1-based line number in the source file.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw value of `field`, or `None` if the field is undeclared or absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// A validated, normalized user record.
///
/// Field order here is the column order of the intermediate file and of the
/// COPY column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: String,
    pub ip_address: String,
    pub full_name: String,
}

/// All records accepted in one run, plus the rows that were dropped.
#[derive(Debug, Default)]
pub struct RecordBatch {
    pub records: Vec<TransformedRecord>,
    pub rejections: Vec<Rejection>,
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }

    /// Rows read from the input, accepted or not.
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.rejected()
    }
}
