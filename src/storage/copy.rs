//! Streaming bulk load with `COPY ... FROM STDIN`.
//!
//! The intermediate file is forwarded to the server one bounded chunk at a
//! time, so peak memory does not grow with file size. A failure anywhere in
//! the stream aborts the COPY; nothing is retried.

use std::ops::DerefMut;
use std::path::Path;

use log::{debug, info, warn};
use sqlx::postgres::{PgConnection, PgCopyIn};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::OUTPUT_DELIMITER;
use crate::error_handling::{LoadError, PipelineError};

/// Parameters of a CSV-mode `COPY ... FROM STDIN` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    /// Destination table, used verbatim (may be schema-qualified and quoted)
    pub table: String,
    /// Destination columns, in file order
    pub columns: Vec<String>,
    /// Field delimiter of the streamed file
    pub delimiter: u8,
    /// Whether the first streamed line is a header to skip
    pub header: bool,
    /// Unquoted token the server maps to NULL
    pub null: String,
}

impl CopyCommand {
    /// COPY into `table` matching the intermediate file: `|` delimited,
    /// header present, empty unquoted field as NULL.
    pub fn for_table<C: AsRef<str>>(table: &str, columns: &[C]) -> Self {
        Self {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            delimiter: OUTPUT_DELIMITER,
            header: true,
            null: String::new(),
        }
    }

    /// Renders the SQL statement.
    pub fn to_sql(&self) -> String {
        let mut sql = format!(
            "COPY {} ({}) FROM STDIN WITH CSV DELIMITER '{}'",
            self.table,
            self.columns.join(","),
            quote_literal(&char::from(self.delimiter).to_string()),
        );
        if self.header {
            sql.push_str(" HEADER");
        }
        sql.push_str(&format!(" NULL AS '{}'", quote_literal(&self.null)));
        sql
    }
}

fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Receiving end of a COPY stream.
///
/// Implemented for sqlx's [`PgCopyIn`]; tests substitute an in-memory sink.
#[allow(async_fn_in_trait)]
pub trait CopySink {
    /// Forwards one chunk of file bytes.
    async fn send(&mut self, chunk: &[u8]) -> Result<(), sqlx::Error>;

    /// Completes the COPY, returning the number of rows the server accepted.
    async fn finish(self) -> Result<u64, sqlx::Error>;

    /// Cancels the COPY; the server discards everything sent so far.
    async fn abort(self, reason: String) -> Result<(), sqlx::Error>;
}

impl<C: DerefMut<Target = PgConnection>> CopySink for PgCopyIn<C> {
    async fn send(&mut self, chunk: &[u8]) -> Result<(), sqlx::Error> {
        PgCopyIn::send(self, chunk).await.map(|_| ())
    }

    async fn finish(self) -> Result<u64, sqlx::Error> {
        PgCopyIn::finish(self).await
    }

    async fn abort(self, reason: String) -> Result<(), sqlx::Error> {
        PgCopyIn::abort(self, reason).await
    }
}

/// Byte and row counts of a completed COPY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub bytes: u64,
    pub rows: u64,
}

/// Streams `source` into `sink` in chunks of at most `chunk_size` bytes,
/// then completes the COPY.
///
/// On any read or send failure the COPY is aborted before the error is
/// returned.
///
/// # Errors
///
/// - `LoadError::SourceRead` if reading `source` fails
/// - `LoadError::Send` if the server stops accepting data
/// - `LoadError::Finish` if the server rejects the data at completion
pub async fn copy_from_reader<R, S>(
    mut sink: S,
    mut source: R,
    chunk_size: usize,
) -> Result<CopyStats, LoadError>
where
    R: AsyncRead + Unpin,
    S: CopySink,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut bytes_sent: u64 = 0;

    let failure = loop {
        let n = match source.read(&mut buf).await {
            Ok(0) => break None,
            Ok(n) => n,
            Err(e) => break Some(LoadError::SourceRead(e)),
        };
        if let Err(e) = sink.send(&buf[..n]).await {
            break Some(LoadError::Send {
                bytes_sent,
                source: e,
            });
        }
        bytes_sent += n as u64;
    };

    if let Some(err) = failure {
        if let Err(abort_err) = sink.abort(err.to_string()).await {
            warn!("Failed to abort COPY cleanly: {abort_err}");
        }
        return Err(err);
    }

    let rows = sink.finish().await.map_err(LoadError::Finish)?;
    debug!("COPY finished: {bytes_sent} bytes, {rows} rows");
    Ok(CopyStats {
        bytes: bytes_sent,
        rows,
    })
}

/// Empties `table` so a subsequent load does not duplicate earlier runs.
///
/// # Errors
///
/// Returns `LoadError::SqlError` if the statement fails.
pub async fn truncate_table(conn: &mut PgConnection, table: &str) -> Result<(), LoadError> {
    let sql = format!("TRUNCATE {table}");
    sqlx::query(&sql).execute(&mut *conn).await?;
    info!("Truncated {table}");
    Ok(())
}

/// Streams the file at `path` into the destination described by `command`.
///
/// # Errors
///
/// - `PipelineError::Io` if the file cannot be opened
/// - `PipelineError::Load` for any failure once the COPY has been issued
pub async fn load_file(
    conn: &mut PgConnection,
    command: &CopyCommand,
    path: &Path,
    chunk_size: usize,
) -> Result<CopyStats, PipelineError> {
    info!("Copying data to postgres");

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| PipelineError::io(path, e))?;

    let query = command.to_sql();
    debug!("{query}");
    let copy_in = conn
        .copy_in_raw(&query)
        .await
        .map_err(|source| LoadError::CopyStart {
            query: query.clone(),
            source,
        })?;

    let stats = copy_from_reader(copy_in, file, chunk_size).await?;
    info!(
        "Data was copied into postgres ({} rows, {} bytes)",
        stats.rows, stats.bytes
    );
    Ok(stats)
}
