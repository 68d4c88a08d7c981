use crate::BatchError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_FILENAME: &str = "science.log";

/// A log file together with the identifiers encoded in its location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogFile {
    pub run: u32,
    pub clone: u32,
    pub generation: u32,
    pub path: PathBuf,
}

/// Walks a project directory for `RUN*/CLONE*/results*/<filename>`.
pub struct LogScanner {
    root: PathBuf,
    filename: String,
    pattern: Regex,
}

impl LogScanner {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BatchError> {
        Self::with_filename(root, DEFAULT_FILENAME)
    }

    pub fn with_filename(root: impl Into<PathBuf>, filename: &str) -> Result<Self, BatchError> {
        let pattern = Regex::new(&format!(
            r"^RUN(\d+)/CLONE(\d+)/results(\d+)/{}$",
            regex::escape(filename)
        ))?;
        Ok(Self {
            root: root.into(),
            filename: filename.to_string(),
            pattern,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns every matching log, ordered by run, clone and generation.
    ///
    /// Files with the right name whose directories don't follow the
    /// `RUN<n>/CLONE<n>/results<n>` pattern are skipped with a warning, as
    /// are directory entries that can't be read.
    pub fn scan(&self) -> Result<Vec<LogFile>, BatchError> {
        if !self.root.is_dir() {
            return Err(BatchError::NotADirectory(self.root.clone()));
        }

        log::info!("Scanning for {} files in: {:?}", self.filename, self.root);
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(4).max_depth(4) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != self.filename.as_str() {
                continue;
            }
            match self.classify(entry.path()) {
                Some(file) => files.push(file),
                None => log::warn!(
                    "Path {:?} didn't match pattern {}",
                    entry.path(),
                    self.pattern.as_str()
                ),
            }
        }

        files.sort();
        log::info!("Found {} log files", files.len());
        Ok(files)
    }

    /// Recovers run, clone and generation from a path below the root.
    pub fn classify(&self, path: &Path) -> Option<LogFile> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let components: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        let joined = components.join("/");
        let caps = self.pattern.captures(&joined)?;
        let number = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();

        Some(LogFile {
            run: number(1)?,
            clone: number(2)?,
            generation: number(3)?,
            path: path.to_path_buf(),
        })
    }
}
