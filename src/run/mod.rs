//! Pipeline driver.
//!
//! Sequences Reader → Transformer → Writer → Loader, aborting on the first
//! unrecovered fault, and reports wall-clock time whatever the outcome.

use std::path::PathBuf;
use std::time::Instant;

use log::{error, info};

use crate::config::{Config, INPUT_FIELDS, OUTPUT_FIELDS};
use crate::error_handling::{error_chain, PipelineError, Rejection};
use crate::export::write_batch;
use crate::reader::RowReader;
use crate::storage::{connect, load_file, truncate_table, CopyCommand};
use crate::transform::transform_all;

/// Results of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Data rows read from the input file
    pub rows_read: usize,
    /// Rows that passed validation and were written
    pub accepted: usize,
    /// Rows dropped by the transformer
    pub rejected: usize,
    /// Why each dropped row was rejected, in input order
    pub rejections: Vec<Rejection>,
    /// Rows the destination reported loading, `None` if loading was skipped
    pub rows_loaded: Option<u64>,
    /// Path of the intermediate file
    pub output_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Outcome of [`drive`]: the pipeline result plus total elapsed time,
/// which is measured even when the run fails.
#[derive(Debug)]
pub struct PipelineRun {
    pub result: Result<PipelineReport, PipelineError>,
    pub elapsed_seconds: f64,
}

impl PipelineRun {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// Process exit status: 0 on success, 1 on failure.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }
}

/// Runs the pipeline once with the provided configuration.
///
/// The destination connection is opened only after the intermediate file
/// has been written and closed, and only when `config.load` is set.
///
/// # Errors
///
/// This function will return an error if:
/// - The configuration is invalid
/// - The input file cannot be opened or parsed
/// - No row survives transformation (nothing is written or loaded)
/// - The intermediate file cannot be written
/// - Connecting to, or streaming into, the destination fails
pub async fn run_pipeline(config: &Config) -> Result<PipelineReport, PipelineError> {
    let start_time = Instant::now();
    config.validate()?;

    let rows = RowReader::open(&config.input, &INPUT_FIELDS)?;
    let batch = transform_all(rows, config.ip_address_source)?;
    let rows_read = batch.rows_read();

    let accepted = write_batch(&config.output, &batch)?;
    let rejections = batch.rejections;
    drop(batch.records);

    let rows_loaded = if config.load {
        let mut conn = connect(&config.pg).await?;
        if config.truncate {
            truncate_table(&mut conn, &config.table).await?;
        }
        let command = CopyCommand::for_table(&config.table, &OUTPUT_FIELDS);
        let stats = load_file(&mut conn, &command, &config.output, config.chunk_size).await?;
        Some(stats.rows)
    } else {
        info!("Skipping database load (--no-load)");
        None
    };

    Ok(PipelineReport {
        rows_read,
        accepted,
        rejected: rejections.len(),
        rejections,
        rows_loaded,
        output_path: config.output.clone(),
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}

/// Runs the pipeline, logs its outcome, and always logs the elapsed time.
///
/// Faults are logged with their full cause chain and returned in
/// [`PipelineRun::result`]; nothing is swallowed.
pub async fn drive(config: &Config) -> PipelineRun {
    let start_time = Instant::now();
    info!("******************* STARTING PIPELINE *******************");

    let result = run_pipeline(config).await;
    match &result {
        Ok(report) => {
            info!(
                "Read {} rows: {} accepted, {} rejected",
                report.rows_read, report.accepted, report.rejected
            );
            info!("******************* PIPELINE FINISHED *******************");
        }
        Err(e) => {
            error!("Pipeline failed [{}]: {}", e.kind(), error_chain(e));
        }
    }

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    info!("Elapsed run time: {:.3} seconds", elapsed_seconds);

    PipelineRun {
        result,
        elapsed_seconds,
    }
}
