//! Library and system banners written between the header and the runtime
//! log. Only their boundaries are recognised; their bodies are discarded.

use super::lexical::{any_heading, match_heading, section_break};
use super::primitives::{PResult, take_until_match};
use crate::config::{BannerSection, SectionLayout};
use nom::branch::alt;
use nom::combinator::{map, opt, value};
use nom::error::context;

fn section_body(input: &str) -> PResult<'_, &str> {
    take_until_match(alt((value((), any_heading), value((), section_break))))(input)
}

/// Any heading followed by its opaque body; yields the heading name.
pub fn any_section(input: &str) -> PResult<'_, &str> {
    let (input, name) = any_heading(input)?;
    let (input, _) = section_body(input)?;
    Ok((input, name))
}

fn named_section<'a>(input: &'a str, section: &BannerSection) -> PResult<'a, &'a str> {
    let (input, name) = match_heading(&section.name)(input)?;
    let (input, _) = section_body(input)?;
    Ok((input, name))
}

/// Consumes the banner sections described by `layout`, returning the names
/// of the sections actually present.
pub fn pass_through_sections<'a>(
    input: &'a str,
    layout: &SectionLayout,
) -> PResult<'a, Vec<&'a str>> {
    let mut input = input;
    let mut seen = Vec::new();

    match layout {
        SectionLayout::Fixed { count } => {
            for _ in 0..*count {
                let (rest, name) = context("banner section", any_section)(input)?;
                seen.push(name);
                input = rest;
            }
        }
        SectionLayout::Named { sections } => {
            for section in sections {
                let parser =
                    context("named banner section", |i: &'a str| named_section(i, section));
                let (rest, name) = if section.required {
                    map(parser, Some)(input)?
                } else {
                    opt(parser)(input)?
                };
                match name {
                    Some(name) => seen.push(name),
                    None => log::trace!("optional section `{}` not present", section.name),
                }
                input = rest;
            }
        }
    }

    Ok((input, seen))
}
