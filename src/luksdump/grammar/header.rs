//! Header grammar shared by both dialects.

use chumsky::prelude::*;

use super::combinators::{blank_lines, key, line_value, newline, text, ParserError};

/// First line of every dump, optionally followed by ` for luks1` or similar.
pub const BANNER: &str = "LUKS header information";

/// Label prefix of LUKS1 key slot lines, which end the header.
pub const SLOT_PREFIX: &str = "Key Slot";

fn banner() -> impl Parser<char, (), Error = ParserError> + Clone {
    just(BANNER)
        .ignore_then(text())
        .then_ignore(newline())
        .then_ignore(blank_lines())
        .ignored()
}

/// One zero-indentation `Key: value` line with a non-empty value.
///
/// A key with nothing after the colon is a LUKS2 section name and a
/// `Key Slot N` key is a LUKS1 slot; both end the header.
pub(crate) fn field(
    continuation_indent: usize,
) -> impl Parser<char, (String, String), Error = ParserError> + Clone {
    key()
        .try_map(|key, span| {
            if key.starts_with(SLOT_PREFIX) {
                Err(Simple::custom(span, "a key slot ends the header"))
            } else {
                Ok(key)
            }
        })
        .then(line_value(continuation_indent))
        .try_map(|(key, value), span| {
            if value.is_empty() {
                Err(Simple::custom(
                    span,
                    format!("header field `{}` has no value", key),
                ))
            } else {
                Ok((key, value))
            }
        })
}

/// Banner, header fields, and the blank lines after them.
pub fn header(
    continuation_indent: usize,
) -> impl Parser<char, Vec<(String, String)>, Error = ParserError> + Clone {
    banner()
        .ignore_then(field(continuation_indent).repeated().at_least(1))
        .then_ignore(blank_lines())
}
