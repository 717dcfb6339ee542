//! LUKS1 body grammar: a flat run of key slots.
//!
//! ```text
//! Key Slot 0: ENABLED
//!         Iterations:             2099250
//!         Salt:                   ca fe ba be ...
//!                                       de ad be ef
//! Key Slot 1: DISABLED
//! ```

use chumsky::prelude::*;

use super::combinators::{attribute_block, blank_lines, key, line_value, ParserError};
use super::header::SLOT_PREFIX;
use crate::luksdump::ast::{Entry, EntryTag};

/// `Key Slot N`, with a decimal slot number.
pub(crate) fn is_slot_label(label: &str) -> bool {
    label
        .strip_prefix(SLOT_PREFIX)
        .and_then(|rest| rest.strip_prefix(' '))
        .map_or(false, |n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// `Key Slot N: STATUS`, then the slot's attributes when it is enabled.
pub(crate) fn key_slot(
    continuation_indent: usize,
) -> impl Parser<char, Entry, Error = ParserError> + Clone {
    key()
        .try_map(|label, span| {
            if is_slot_label(&label) {
                Ok(label)
            } else {
                Err(Simple::custom(
                    span,
                    format!("expected `{} N`, found `{}`", SLOT_PREFIX, label),
                ))
            }
        })
        .then(line_value(continuation_indent))
        .try_map(|(label, status), span| {
            if status.is_empty() {
                Err(Simple::custom(span, format!("`{}` has no status", label)))
            } else {
                Ok((label, status))
            }
        })
        .then(attribute_block(0))
        .then_ignore(blank_lines())
        .map(|((label, status), attributes)| {
            Entry::new(label, EntryTag::Status(status), attributes)
        })
}

pub fn body(continuation_indent: usize) -> impl Parser<char, Vec<Entry>, Error = ParserError> + Clone {
    key_slot(continuation_indent).repeated()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_and_disabled_slots() {
        let input = "Key Slot 0: ENABLED\n        Iterations:         2099250\n        Key material offset:8\nKey Slot 1: DISABLED\n";
        let slots = body(23).then_ignore(end()).parse(input).expect("slots to parse");

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].index, "Key Slot 0");
        assert_eq!(slots[0].status(), Some("ENABLED"));
        assert_eq!(slots[0].attributes.get("Iterations"), Some("2099250"));
        assert_eq!(slots[0].attributes.get("Key material offset"), Some("8"));
        assert_eq!(slots[1].status(), Some("DISABLED"));
        assert!(slots[1].attributes.is_empty());
    }

    #[test]
    fn test_slot_attribute_continuation() {
        let input = "Key Slot 0: ENABLED\n        Salt:               ca fe ba be \n                                      de ad be ef \n        AF stripes:            4000\n";
        let slots = body(23).then_ignore(end()).parse(input).expect("slots to parse");
        assert_eq!(slots[0].attributes.get("Salt"), Some("ca fe ba be de ad be ef"));
        assert_eq!(slots[0].attributes.get("AF stripes"), Some("4000"));
    }

    #[test]
    fn test_slot_label() {
        assert!(is_slot_label("Key Slot 0"));
        assert!(is_slot_label("Key Slot 12"));
        assert!(!is_slot_label("Key Slot"));
        assert!(!is_slot_label("Key Slot x"));
        assert!(!is_slot_label("Keyslots"));
        assert!(!is_slot_label("Tokens"));
    }

    #[test]
    fn test_rejects_lines_that_are_not_key_slots() {
        let input = "Keyslots:\n  0: luks2\n        Key: 512 bits\n";
        assert!(body(23).then_ignore(end()).parse(input).is_err());
    }

    #[test]
    fn test_rejects_slot_without_status() {
        assert!(body(23).then_ignore(end()).parse("Key Slot 0:\n").is_err());
        assert!(body(23).then_ignore(end()).parse("Key Slot 0:   \n").is_err());
    }

    #[test]
    fn test_empty_body() {
        let slots = body(23).then_ignore(end()).parse("").expect("empty body");
        assert!(slots.is_empty());
    }
}
