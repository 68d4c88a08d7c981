use nom::error::{ErrorKind, VerboseError, VerboseErrorKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A grammar violation: the construct `expected` was not found at `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error(
    "line {line}, column {column}: expected {expected}{}",
    render_context(.context)
)]
pub struct ParseError {
    /// Byte offset into the parsed text.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    pub expected: String,
    /// Enclosing grammar rules, innermost first.
    pub context: Vec<String>,
    /// The full source line containing `offset`.
    pub source_line: String,
}

fn render_context(context: &[String]) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" (in {})", context.join(" < "))
    }
}

impl ParseError {
    pub fn at(input: &str, offset: usize, expected: impl Into<String>) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line_end = input[offset..]
            .find('\n')
            .map_or(input.len(), |i| offset + i);

        Self {
            offset,
            line: before.matches('\n').count() + 1,
            column: input[line_start..offset].chars().count() + 1,
            expected: expected.into(),
            context: Vec::new(),
            source_line: input[line_start..line_end].trim_end_matches('\r').to_string(),
        }
    }

    /// Builds a positioned error from the accumulated nom error stack.
    ///
    /// Every entry's input is a suffix of `input`, so its length locates the
    /// failure. The innermost entry decides the position; the innermost
    /// `context` label, if any, names what was expected.
    pub(crate) fn from_verbose(input: &str, err: &VerboseError<&str>) -> Self {
        let Some((remaining, kind)) = err.errors.first() else {
            return Self::at(input, input.len(), "well-formed science log");
        };

        let contexts: Vec<String> = err
            .errors
            .iter()
            .filter_map(|(_, kind)| match kind {
                VerboseErrorKind::Context(label) => Some((*label).to_string()),
                _ => None,
            })
            .collect();

        let expected = contexts
            .first()
            .cloned()
            .unwrap_or_else(|| describe_kind(kind));

        let mut error = Self::at(input, input.len() - remaining.len(), expected);
        error.context = contexts.into_iter().skip(1).collect();
        error
    }
}

fn describe_kind(kind: &VerboseErrorKind) -> String {
    match kind {
        VerboseErrorKind::Context(label) => (*label).to_string(),
        VerboseErrorKind::Char(c) => format!("{c:?}"),
        VerboseErrorKind::Nom(ErrorKind::Tag) => "literal text".to_string(),
        VerboseErrorKind::Nom(ErrorKind::Digit) => "digits".to_string(),
        VerboseErrorKind::Nom(ErrorKind::Eof) => "end of input".to_string(),
        VerboseErrorKind::Nom(ErrorKind::CrLf) => "newline".to_string(),
        VerboseErrorKind::Nom(other) => other.description().to_lowercase(),
    }
}

/// Failure to turn a file on disk into a [`ScienceLog`](crate::ir::ScienceLog).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not valid UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
    #[error("{}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::Parse { path, .. } => path,
        }
    }
}

/// A structurally valid log whose active hardware cannot be determined.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ResolveError {
    #[error("platform index {index} is out of range: the log lists {available} platform(s)")]
    PlatformOutOfRange { index: usize, available: usize },
    #[error(
        "device index {index} is out of range: platform {platform} lists {available} device(s)"
    )]
    DeviceOutOfRange {
        platform: usize,
        index: usize,
        available: usize,
    },
    #[error("CUDA backend was engaged but no platform is named `{name}`")]
    BackendPlatformNotFound { name: String },
    #[error("argument -{key} does not hold a device index (value: {value:?})")]
    InvalidIndexArgument { key: String, value: Option<String> },
}
