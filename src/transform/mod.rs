//! Row validation and normalization.
//!
//! [`transform`] maps one [`RawRecord`] to an [`Outcome`] without side
//! effects. [`transform_all`] drives a row source through it, logs one
//! diagnostic per rejected row, and collects the [`RecordBatch`] of accepted
//! records and rejections.

use log::{info, warn};

use crate::config::IpAddressSource;
use crate::error_handling::{PipelineError, Rejection};
use crate::models::{RawRecord, RecordBatch, TransformedRecord};

/// Result of transforming a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(TransformedRecord),
    Rejected(Rejection),
}

/// Validates and normalizes one row.
///
/// - `id` must parse as an integer (surrounding whitespace allowed); this is
///   the only rejection rule.
/// - String fields are stripped; absent fields become empty.
/// - `ip_address` is taken from the column selected by `ip_source`.
/// - `full_name` is `first_name + " " + last_name`, with no special case
///   for empty parts.
pub fn transform(raw: &RawRecord, ip_source: IpAddressSource) -> Outcome {
    let id = match raw.get("id").map(|v| v.trim().parse::<i64>()) {
        Some(Ok(id)) => id,
        _ => {
            return Outcome::Rejected(Rejection {
                line: raw.line(),
                field: "id",
                value: raw.get("id").map(str::to_string),
            })
        }
    };

    let stripped = |field: &str| raw.get(field).unwrap_or_default().trim().to_string();

    let first_name = stripped("first_name");
    let last_name = stripped("last_name");
    let gender = stripped("gender");
    let ip_address = match ip_source {
        IpAddressSource::Gender => gender.clone(),
        IpAddressSource::IpAddress => stripped("ip_address"),
    };
    let full_name = format!("{first_name} {last_name}");

    Outcome::Accepted(TransformedRecord {
        id,
        first_name,
        last_name,
        email: stripped("email"),
        gender,
        ip_address,
        full_name,
    })
}

/// Transforms every row from `rows`, setting rejected ones aside.
///
/// # Errors
///
/// Stops at and returns the first error produced by the row source.
pub fn transform_all<I>(rows: I, ip_source: IpAddressSource) -> Result<RecordBatch, PipelineError>
where
    I: IntoIterator<Item = Result<RawRecord, PipelineError>>,
{
    let mut batch = RecordBatch::default();

    for row in rows {
        match transform(&row?, ip_source) {
            Outcome::Accepted(record) => batch.records.push(record),
            Outcome::Rejected(rejection) => {
                warn!("{rejection}");
                batch.rejections.push(rejection);
            }
        }
    }

    info!(
        "Number of rows read and transformed: {} ({} rows rejected)",
        batch.len(),
        batch.rejected()
    );
    Ok(batch)
}
