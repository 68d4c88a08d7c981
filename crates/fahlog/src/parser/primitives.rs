//! Format-agnostic building blocks shared by every grammar rule.
//!
//! All parsers run over `&str` and report failures as [`VerboseError`]s so a
//! failed parse can be traced back to the innermost `context` label.

use crate::ir::SemVer;
use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, line_ending, multispace0, space0},
    combinator::{eof, map, map_res, opt, recognize},
    error::{VerboseError, context},
    sequence::{pair, preceded, terminated, tuple},
    IResult, Parser,
};

pub type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

pub fn decimal(input: &str) -> PResult<'_, u32> {
    context("integer", map_res(digit1, str::parse::<u32>))(input)
}

pub fn index(input: &str) -> PResult<'_, usize> {
    context("integer", map_res(digit1, str::parse::<usize>))(input)
}

pub fn floating(input: &str) -> PResult<'_, f64> {
    context(
        "floating-point number",
        map_res(
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            str::parse::<f64>,
        ),
    )(input)
}

pub fn semver(input: &str) -> PResult<'_, SemVer> {
    context(
        "semantic version",
        map(
            tuple((decimal, char('.'), decimal, char('.'), decimal)),
            |(major, _, minor, _, patch)| SemVer::new(major, minor, patch),
        ),
    )(input)
}

/// A line terminator, or the end of input for a final unterminated line.
pub fn end_of_line(input: &str) -> PResult<'_, &str> {
    context("newline", alt((line_ending, eof)))(input)
}

pub fn blank_line(input: &str) -> PResult<'_, &str> {
    context("blank line", recognize(pair(space0, line_ending)))(input)
}

/// Runs `p` on its own line: leading whitespace (blank lines included) is
/// skipped and the line terminator after `p` is required.
pub fn line_with<'a, O, F>(p: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    preceded(multispace0, terminated(p, end_of_line))
}

/// Consumes whole lines up to the first line on which `until` succeeds,
/// without consuming that line.
///
/// `until` is tried at the start of the input and at the start of every
/// following non-blank line, so the first terminator wins even when several
/// kinds are combined with `alt`. Runs to the end of input when no line
/// matches. Each line is visited once, so long runs of blank lines or
/// indentation stay linear.
pub fn take_until_match<'a, O, F>(mut until: F) -> impl FnMut(&'a str) -> PResult<'a, &'a str>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    move |input: &'a str| {
        let mut offset = 0;
        loop {
            let rest = &input[offset..];
            let line_len = rest.find('\n').map_or(rest.len(), |n| n + 1);
            let line = &rest[..line_len];

            if !(line.ends_with('\n') && line.trim().is_empty()) {
                match until.parse(rest) {
                    Ok(_) => return Ok((rest, &input[..offset])),
                    Err(nom::Err::Error(_)) => {}
                    Err(e) => return Err(e),
                }
            }
            if rest.is_empty() {
                return Ok((rest, input));
            }
            offset += line_len;
        }
    }
}

/// Parses exactly `count` items, handing each its positional index.
pub fn numbered<'a, O>(
    mut input: &'a str,
    count: usize,
    mut item: impl FnMut(&'a str, usize) -> PResult<'a, O>,
) -> PResult<'a, Vec<O>> {
    // Counts come from the log itself; don't trust them for preallocation.
    let mut items = Vec::with_capacity(count.min(16));
    for idx in 0..count {
        let (rest, parsed) = item(input, idx)?;
        items.push(parsed);
        input = rest;
    }
    Ok((input, items))
}
