//! Diagnostics logged for rejected rows.
//!
//! Installs a process-wide capturing logger, so this file holds a single test.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use tempfile::TempDir;
use user_etl::run_pipeline;

#[path = "helpers.rs"]
mod helpers;

use helpers::{offline_config, write_input};

struct CaptureLogger {
    records: Mutex<Vec<(Level, String, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().unwrap().push((
            record.level(),
            record.target().to_string(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

#[tokio::test]
async fn test_one_warning_per_rejected_row() {
    log::set_logger(&LOGGER).expect("Failed to install logger");
    log::set_max_level(LevelFilter::Trace);

    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        &[
            "1,John,Doe,j@x.com,M,1.2.3.4",
            "abc,Jane,Smith,j@x.com,F,5.6.7.8",
            "3,Ann,Lee,a@x.com,F,2.2.2.2",
        ],
    );
    let config = offline_config(dir.path(), input);

    let report = run_pipeline(&config).await.unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.rejections.len(), 1);
    assert_eq!(report.rejections[0].value.as_deref(), Some("abc"));

    let warnings: Vec<String> = LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, target, _)| *level == Level::Warn && target.starts_with("user_etl"))
        .map(|(_, _, msg)| msg.clone())
        .collect();

    assert_eq!(warnings.len(), 1, "warnings: {warnings:?}");
    assert!(warnings[0].contains("line 3"));
    assert!(warnings[0].contains("id"));
    assert!(warnings[0].contains("\"abc\""));
}
