//! Dialect resolution and tree building
//!
//! Parsing happens in two passes over the normalized text:
//!
//! 1. The header grammar runs on its own so the `Version` field can be read.
//! 2. The remainder is parsed, to the end of input, with the body grammar of
//!    that version.
//!
//! The version is inspected exactly once, turned into [`Version`], and matched
//! exhaustively; an unknown value is an error, never a guess.

use chumsky::prelude::*;
use serde::Deserialize;

use crate::luksdump::ast::{AttributeMap, Body, DumpTree, Header, Version};
use crate::luksdump::classify;
use crate::luksdump::error::{DumpError, ParseError};
use crate::luksdump::grammar::{self, header, luks1, luks2};

/// Column at which the tool wraps zero- and first-level values:
/// 15 spaces plus one expanded tab.
pub const CONTINUATION_INDENT: usize = 23;

/// Tunables of the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Minimum number of sections a LUKS2 body must contain.
    ///
    /// `cryptsetup` always prints at least `Data segments`, so a LUKS2 dump
    /// with no section at all is treated as truncated unless this is 0.
    pub min_luks2_sections: usize,
    /// Exact indentation of continuation lines under zero- and first-level fields.
    pub continuation_indent: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            min_luks2_sections: 1,
            continuation_indent: CONTINUATION_INDENT,
        }
    }
}

/// Parses normalized dump text with default options.
pub fn parse(text: &str) -> Result<DumpTree, DumpError> {
    parse_with(text, &ParseOptions::default())
}

/// Parses normalized dump text.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<DumpTree, DumpError> {
    if let Some(reason) = classify::not_applicable(text) {
        log::debug!("skipping dump: {}", reason);
        return Err(DumpError::NotApplicable(reason));
    }

    let (fields, rest) = header::header(options.continuation_indent)
        .then(any::<char, Simple<char>>().repeated().collect::<String>())
        .parse(text)
        .map_err(|errors| ParseError::from_simple(errors, text, 0))?;

    let header = build_header(fields)?;
    let offset = text.chars().count() - rest.chars().count();
    log::debug!("dump {} declares {}", header.uuid(), header.version());

    let body = match header.version() {
        Version::Luks1 => luks1::body(options.continuation_indent)
            .map(Body::Luks1)
            .then_ignore(end())
            .parse(rest.as_str()),
        Version::Luks2 => {
            luks2::body(options.min_luks2_sections, options.continuation_indent)
                .map(Body::Luks2)
                .then_ignore(end())
                .parse(rest.as_str())
        }
    }
    .map_err(|errors| ParseError::from_simple(errors, text, offset))?;

    Ok(DumpTree::new(header, body))
}

/// Parses a body without a header, trying LUKS2 before LUKS1.
pub fn parse_body(text: &str, options: &ParseOptions) -> Result<Body, ParseError> {
    grammar::any_body(options.min_luks2_sections, options.continuation_indent)
        .parse(text)
        .map_err(|errors| ParseError::from_simple(errors, text, 0))
}

/// Checks the fields every header must carry and resolves the dialect.
fn build_header(fields: Vec<(String, String)>) -> Result<Header, ParseError> {
    let attributes: AttributeMap = fields.into_iter().collect();
    let raw = attributes
        .get("Version")
        .ok_or(ParseError::MissingField("Version"))?;
    let version =
        Version::from_field(raw).ok_or_else(|| ParseError::UnsupportedVersion(raw.to_string()))?;
    if !attributes.contains_key("UUID") {
        return Err(ParseError::MissingField("UUID"));
    }
    Ok(Header::new(version, attributes))
}
