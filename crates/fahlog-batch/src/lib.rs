//! Batch processing of science logs laid out as a Folding@home project tree:
//! `RUN<run>/CLONE<clone>/results<gen>/science.log`.
//!
//! [`discover`] finds the logs, [`batch`] parses them in parallel and reduces
//! each to a [`ResultRow`], and [`export`] writes the rows as CSV or JSON.

use std::path::PathBuf;
use thiserror::Error;

pub mod batch;
pub mod discover;
pub mod export;
pub mod row;

pub use batch::{BatchOptions, BatchReport, Failure, FailureKind, parse_directory, run_batch};
pub use discover::{DEFAULT_FILENAME, LogFile, LogScanner};
pub use export::{ExportFormat, export_to_path, write_rows};
pub use row::ResultRow;

/// Errors that abort a whole batch. Per-file problems are recorded in
/// [`BatchReport::failures`] instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("invalid log file name pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}
