//! # fahlog
//!
//! Parser for the `science.log` files written by the Folding@home Core22 GPU
//! core.
//!
//! ## Overview
//!
//! A science log is a semi-structured text file: a fixed header of
//! `key: value` properties, several library banners this crate only skips
//! over, an 80-star rule, and a runtime log. This crate turns it into a typed
//! [`ScienceLog`](ir::ScienceLog) holding:
//!
//! - **Build metadata**: core name, version, build date, compiler, `Args:`
//! - **Hardware enumeration**: every OpenCL platform and its devices
//! - **Backend status**: whether the CUDA backend was engaged, and on which GPU
//! - **Performance**: per-checkpoint and average throughput in ns/day
//!
//! The [`resolve`] module then answers which device the run actually used.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   parse()   ┌──────────────────┐   active_hardware()   ┌────────────────┐
//! │ science.log  │ ──────────► │   ScienceLog     │ ────────────────────► │ ActiveHardware │
//! └──────────────┘             └──────────────────┘                       └────────────────┘
//!         header ─► banner sections ─► section break ─► runtime log
//! ```
//!
//! The grammar lives in [`parser`] and is written with `nom` combinators.
//! Parsing is all-or-nothing: a document either matches or yields one
//! [`ParseError`](error::ParseError) pointing at the line and column where the
//! expected construct was missing.
//!
//! ## Format revisions
//!
//! The core's output changed over its lifetime. [`FormatConfig`](config::FormatConfig)
//! captures the differences (banner layout, `DRIVER_VERSION`, the backend
//! status line) and [`FormatRevision`](config::FormatRevision) names the
//! known presets. The default is the current layout.
//!
//! ## Schema Versioning
//!
//! The JSON shape of the IR is versioned by [`SCHEMA_VERSION`]:
//!
//! - **MAJOR**: Breaking changes to field names or types
//! - **MINOR**: New optional fields
//! - **PATCH**: Parsing fixes with no schema change
//!
//! ## Examples
//!
//! ### Parsing a file
//!
//! ```no_run
//! use fahlog::ScienceLogParser;
//!
//! let log = ScienceLogParser::new().parse_file("RUN0/CLONE0/results0/science.log")?;
//! println!("{} ns/day", log.log.average_perf.unwrap_or_default());
//!
//! let device = log.active_device()?;
//! println!("ran on {}", device.name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Legacy logs
//!
//! ```no_run
//! use fahlog::{FormatRevision, ScienceLogParser};
//! use std::fs;
//!
//! let text = fs::read_to_string("science.log")?;
//! let parser = ScienceLogParser::with_revision(FormatRevision::Legacy);
//! match parser.parse(&text) {
//!     Ok(log) => println!("{}", serde_json::to_string_pretty(&log)?),
//!     Err(err) => eprintln!("{err}\n  {}", err.source_line),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Format revisions and resolution options.
pub mod config;
/// Parse, load and resolution errors.
pub mod error;
/// Typed document model.
pub mod ir;
/// `nom` grammar for science logs.
pub mod parser;
/// Active platform and device lookup.
pub mod resolve;


use std::path::Path;

pub use config::{FormatConfig, FormatRevision, ResolveOptions, SectionLayout, TrailingInput};
pub use error::{LoadError, ParseError, ResolveError};
pub use ir::ScienceLog;
pub use parser::ScienceLogParser;
pub use resolve::{ActiveHardware, Selection};

/// Schema version for the science log IR.
///
/// Starting with 1.0.0, backward compatibility is guaranteed within major versions.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Parses `input` with the current format revision.
pub fn parse(input: &str) -> Result<ScienceLog, ParseError> {
    ScienceLogParser::new().parse(input)
}

/// Reads and parses a file with the current format revision.
pub fn read_science_log(path: impl AsRef<Path>) -> Result<ScienceLog, LoadError> {
    ScienceLogParser::new().parse_file(path)
}
