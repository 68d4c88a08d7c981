//! The fixed preamble: core banner, sixteen properties and `Args:`.
//!
//! Properties are matched in the order the core writes them. A property out
//! of place is a grammar violation, not something to search for.

use super::lexical::{command_arguments, match_heading, match_prop, string_prop};
use super::primitives::{PResult, semver};
use crate::ir::CoreHeader;
use chrono::NaiveDate;
use nom::combinator::map_res;
use nom::error::context;

/// `%b %d %Y`, as produced by the C `__DATE__` macro.
pub const BUILD_DATE_FORMAT: &str = "%b %d %Y";

/// Parses a build date such as `Jan 5 2023` or the space-padded `Jan  5 2023`.
pub fn parse_build_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&normalized, BUILD_DATE_FORMAT)
}

fn build_date(input: &str) -> PResult<'_, NaiveDate> {
    context(
        "build date like `Jan 5 2023`",
        map_res(string_prop("Date"), |text| parse_build_date(&text)),
    )(input)
}

pub fn core_header<'a>(input: &'a str, banner: &str) -> PResult<'a, CoreHeader> {
    context("core header", |input: &'a str| header_body(input, banner))(input)
}

fn header_body<'a>(input: &'a str, banner: &str) -> PResult<'a, CoreHeader> {
    let (input, _) = context("core banner heading", match_heading(banner))(input)?;
    let (input, core) = string_prop("Core")(input)?;
    let (input, core_type) = string_prop("Type")(input)?;
    let (input, version) = match_prop("Version", semver)(input)?;
    let (input, author) = string_prop("Author")(input)?;
    let (input, copyright) = string_prop("Copyright")(input)?;
    let (input, homepage) = string_prop("Homepage")(input)?;
    let (input, date) = build_date(input)?;
    let (input, time) = string_prop("Time")(input)?;
    let (input, revision) = string_prop("Revision")(input)?;
    let (input, branch) = string_prop("Branch")(input)?;
    let (input, compiler) = string_prop("Compiler")(input)?;
    let (input, options) = string_prop("Options")(input)?;
    let (input, platform) = string_prop("Platform")(input)?;
    let (input, bits) = string_prop("Bits")(input)?;
    let (input, mode) = string_prop("Mode")(input)?;
    let (input, maintainers) = string_prop("Maintainers")(input)?;
    let (input, args) = match_prop("Args", command_arguments)(input)?;

    Ok((
        input,
        CoreHeader {
            core,
            core_type,
            version,
            author,
            copyright,
            homepage,
            date,
            time,
            revision,
            branch,
            compiler,
            options,
            platform,
            bits,
            mode,
            maintainers,
            args,
        },
    ))
}
