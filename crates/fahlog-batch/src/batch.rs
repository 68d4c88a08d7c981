use crate::discover::{LogFile, LogScanner};
use crate::row::ResultRow;
use crate::BatchError;
use fahlog::{FormatConfig, LoadError, ResolveOptions, ScienceLogParser};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker threads; 0 lets rayon pick.
    pub threads: usize,
    pub format: FormatConfig,
    pub resolve: ResolveOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Io,
    Decode,
    Parse,
    Resolve,
}

/// A log that produced no row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// One row per successfully processed log, in discovery order.
    pub rows: Vec<ResultRow>,
    pub failures: Vec<Failure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rows.len() + self.failures.len()
    }
}

fn process_file(
    file: &LogFile,
    parser: &ScienceLogParser,
    options: &ResolveOptions,
) -> Result<ResultRow, Failure> {
    let failure = |kind, reason: String| Failure {
        path: file.path.clone(),
        kind,
        reason,
    };

    let log = parser.parse_file(&file.path).map_err(|e| {
        let kind = match &e {
            LoadError::Io { .. } => FailureKind::Io,
            LoadError::Decode { .. } => FailureKind::Decode,
            LoadError::Parse { .. } => FailureKind::Parse,
        };
        failure(kind, e.to_string())
    })?;

    ResultRow::from_log(file, &log, options).map_err(|e| {
        failure(
            FailureKind::Resolve,
            format!("{}: {e}", file.path.display()),
        )
    })
}

/// Parses `files` on a dedicated thread pool.
///
/// A file that can't be read, parsed or resolved is logged and recorded as a
/// [`Failure`]; it never aborts the batch.
pub fn run_batch(files: &[LogFile], options: &BatchOptions) -> Result<BatchReport, BatchError> {
    let parser = ScienceLogParser::with_config(options.format.clone());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;
    log::info!(
        "Parsing {} files on {} threads",
        files.len(),
        pool.current_num_threads()
    );

    let mut results: Vec<(usize, Result<ResultRow, Failure>)> = pool.install(|| {
        files
            .par_iter()
            .enumerate()
            .map(|(index, file)| (index, process_file(file, &parser, &options.resolve)))
            .collect()
    });
    results.sort_by_key(|(index, _)| *index);

    let mut report = BatchReport::default();
    for (_, result) in results {
        match result {
            Ok(row) => report.rows.push(row),
            Err(failure) => {
                log::warn!("Parse error: {}", failure.reason);
                report.failures.push(failure);
            }
        }
    }

    if !report.failures.is_empty() {
        log::warn!(
            "Failed to parse {} files out of {}",
            report.failures.len(),
            report.total()
        );
    }
    Ok(report)
}

/// Discovers every log below `root` and runs them as one batch.
pub fn parse_directory(
    root: &Path,
    filename: &str,
    options: &BatchOptions,
) -> Result<BatchReport, BatchError> {
    let files = LogScanner::with_filename(root, filename)?.scan()?;
    run_batch(&files, options)
}
