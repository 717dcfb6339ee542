//! LUKS2 body grammar: named sections of typed, indexed entries.
//!
//! ```text
//! Keyslots:
//!   0: luks2
//!         Key:        512 bits
//!         PBKDF:      argon2id
//! Tokens:
//!   0: systemd-tpm2
//!         Keyslot:    2
//! ```

use chumsky::prelude::*;

use super::combinators::{
    attribute_block, blank_lines, indented_block, inline_ws, key, line_value, newline,
    ParserError,
};
use super::luks1::is_slot_label;
use crate::luksdump::ast::{Entry, EntryTag, Section};

/// `Name:` alone on a zero-indentation line. A LUKS1 slot label is never a section.
pub(crate) fn section_name() -> impl Parser<char, String, Error = ParserError> + Clone {
    key()
        .try_map(|name, span| {
            if is_slot_label(&name) {
                Err(Simple::custom(span, format!("`{}` is a LUKS1 key slot", name)))
            } else {
                Ok(name)
            }
        })
        .then_ignore(inline_ws())
        .then_ignore(newline())
}

/// `index: type` at `column`, then its attributes one level deeper.
pub(crate) fn entry(
    column: usize,
    continuation_indent: usize,
) -> impl Parser<char, Entry, Error = ParserError> + Clone {
    key()
        .then(line_value(continuation_indent))
        .then(attribute_block(column))
        .map(|((index, kind), attributes)| Entry::new(index, EntryTag::Type(kind), attributes))
}

/// A section name and its (possibly empty) group of entries.
pub(crate) fn section(
    continuation_indent: usize,
) -> impl Parser<char, Section, Error = ParserError> + Clone {
    section_name()
        .then(indented_block(0, move |column| entry(column, continuation_indent)).or_not())
        .then_ignore(blank_lines())
        .map(|(name, entries)| Section::new(name, entries.unwrap_or_default()))
}

pub fn body(
    min_sections: usize,
    continuation_indent: usize,
) -> impl Parser<char, Vec<Section>, Error = ParserError> + Clone {
    section(continuation_indent)
        .repeated()
        .at_least(min_sections)
}
