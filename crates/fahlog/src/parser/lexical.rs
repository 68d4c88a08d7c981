//! Line-level constructs of the log: headings, properties, variable
//! definitions, section breaks and command arguments.

use super::primitives::{PResult, index, line_with};
use crate::ir::CommandArgument;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_until, take_while1},
    character::complete::{
        alpha1, char, line_ending, multispace1, not_line_ending, space0, space1,
    },
    combinator::{map, not, opt, recognize, value, verify},
    error::{VerboseError, context},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    Parser,
};

/// Width of the `****...` rule separating the banners from the runtime log.
pub const SECTION_BREAK_WIDTH: usize = 80;

fn stars(input: &str) -> PResult<'_, &str> {
    take_while1(|c| c == '*')(input)
}

/// `*** <name> ***` on its own line.
pub fn heading<'a, O, F>(name: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    line_with(delimited(pair(stars, space1), name, pair(space1, stars)))
}

fn heading_name(input: &str) -> PResult<'_, &str> {
    map(
        verify(take_until(" *"), |name: &str| {
            !name.contains('\n') && !name.trim().is_empty()
        }),
        str::trim,
    )(input)
}

/// A heading with any name; yields the trimmed name.
pub fn any_heading(input: &str) -> PResult<'_, &str> {
    context("heading", heading(heading_name))(input)
}

/// A heading whose name is exactly `name`.
pub fn match_heading<'a, 'n>(name: &'n str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    heading(tag(name))
}

pub fn section_break(input: &str) -> PResult<'_, &str> {
    context(
        "section break",
        line_with(recognize(verify(stars, |s: &str| {
            s.len() == SECTION_BREAK_WIDTH
        }))),
    )(input)
}

/// The first physical line of any `key: value` property.
pub fn any_prop_first_line(input: &str) -> PResult<'_, (&str, &str)> {
    line_with(map(
        tuple((alpha1, tag(": "), take_till1(|c| c == '\n' || c == '\r'))),
        |(key, _, value)| (key, value),
    ))(input)
}

/// True when a whole physical line starts another property or a heading,
/// which ends a free-text property value.
fn starts_new_entry(line: &str) -> bool {
    alt((value((), any_prop_first_line), value((), any_heading)))(line).is_ok()
}

/// A wrapped line belonging to the value before it.
fn continuation_line(input: &str) -> PResult<'_, &str> {
    preceded(
        line_ending,
        verify(not_line_ending, |line: &str| !starts_new_entry(line)),
    )(input)
}

/// `<name>: <value>` where `value` parses the rest of the property.
pub fn match_prop<'a, O, F>(name: &'static str, value: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    context(
        name,
        line_with(preceded(tuple((tag(name), char(':'), space0)), value)),
    )
}

/// A property whose value is free text, possibly wrapped over several lines.
///
/// The value runs until the next line that looks like a property or a heading.
pub fn string_prop<'a>(name: &'static str) -> impl FnMut(&'a str) -> PResult<'a, String> {
    match_prop(
        name,
        map(
            recognize(pair(not_line_ending, many0(continuation_line))),
            |value: &str| value.trim().to_string(),
        ),
    )
}

/// `NAME = value`; the value is the rest of the line, trimmed.
pub fn var_def<'a>(name: &'static str) -> impl FnMut(&'a str) -> PResult<'a, String> {
    context(
        name,
        line_with(map(
            preceded(tuple((tag(name), space0, char('='))), not_line_ending),
            |value: &str| value.trim().to_string(),
        )),
    )
}

/// `-- <expected> --`
pub fn index_marker<'a>(expected: usize) -> impl FnMut(&'a str) -> PResult<'a, usize> {
    context(
        "`-- <index> --` marker",
        line_with(delimited(
            tag("-- "),
            verify(index, move |n: &usize| *n == expected),
            tag(" --"),
        )),
    )
}

fn is_arg_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Any run of non-whitespace that does not itself look like a flag.
fn arg_value(input: &str) -> PResult<'_, &str> {
    recognize(pair(not(char('-')), take_till1(|c: char| c.is_whitespace())))(input)
}

/// `-key`, `-key value` or `-key=value`.
pub fn command_argument(input: &str) -> PResult<'_, CommandArgument> {
    context(
        "command argument",
        map(
            preceded(
                char('-'),
                pair(
                    take_while1(is_arg_key_char),
                    opt(preceded(alt((tag("="), multispace1)), arg_value)),
                ),
            ),
            |(key, value)| CommandArgument::new(key, value),
        ),
    )(input)
}

pub fn command_arguments(input: &str) -> PResult<'_, Vec<CommandArgument>> {
    separated_list0(multispace1, command_argument)(input)
}
