//! Grammar for Core22 `science.log` files.
//!
//! The document is read in four stages, each a nom parser over `&str`:
//!
//! 1. [`header::core_header`]: banner, properties and `Args:`
//! 2. [`sections::pass_through_sections`]: library banners, bodies skipped
//! 3. [`lexical::section_break`]: the 80-star rule
//! 4. [`body::core_log`]: platforms, devices and performance
//!
//! [`ScienceLogParser`] ties them together and converts nom's error stack
//! into a positioned [`ParseError`].

pub mod body;
pub mod header;
pub mod lexical;
pub mod primitives;
pub mod sections;

use crate::config::{FormatConfig, FormatRevision, TrailingInput};
use crate::error::{LoadError, ParseError};
use crate::ir::ScienceLog;
use nom::error::context;
use primitives::PResult;
use std::fs;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parses a whole document, returning whatever input follows the runtime log.
pub fn science_log<'a>(input: &'a str, config: &FormatConfig) -> PResult<'a, ScienceLog> {
    let (input, header) = header::core_header(input, &config.core_banner)?;
    let (input, sections) = sections::pass_through_sections(input, &config.sections)?;
    log::trace!("skipped banner sections: {:?}", sections);
    let (input, _) = lexical::section_break(input)?;
    let (input, log) = context("runtime log", |i: &'a str| body::core_log(i, config))(input)?;
    Ok((input, ScienceLog { header, log }))
}

/// Parser for complete science logs.
///
/// A parser is immutable and can be shared between threads; the format
/// revision is fixed when it is built.
#[derive(Debug, Clone, Default)]
pub struct ScienceLogParser {
    config: FormatConfig,
}

impl ScienceLogParser {
    /// Creates a parser for the current log format.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn with_revision(revision: FormatRevision) -> Self {
        Self::with_config(revision.config())
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Parses the full text of a science log.
    ///
    /// A leading byte order mark is ignored; error offsets are counted from
    /// the first character after it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] locating the first construct that could not
    /// be matched, or the first non-blank text after the runtime log when
    /// trailing input is rejected.
    pub fn parse(&self, input: &str) -> Result<ScienceLog, ParseError> {
        let input = input.strip_prefix(BYTE_ORDER_MARK).unwrap_or(input);

        let (rest, document) = match science_log(input, &self.config) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(ParseError::from_verbose(input, &e));
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(ParseError::at(input, input.len(), "more input"));
            }
        };

        if self.config.trailing == TrailingInput::Reject {
            let trailing = rest.trim_start();
            if !trailing.is_empty() {
                let offset = input.len() - trailing.len();
                return Err(ParseError::at(input, offset, "end of input"));
            }
        }

        log::debug!(
            "parsed science log: core {} v{}, {} platform(s), {} device(s), {} checkpoint(s)",
            document.header.core,
            document.header.version,
            document.log.platform_count(),
            document.log.device_count(),
            document.log.checkpoint_perfs.len()
        );
        Ok(document)
    }

    /// Reads and parses a science log from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ScienceLog, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = std::str::from_utf8(&bytes).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
