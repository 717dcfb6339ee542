//! Grammar for `cryptsetup luksDump` output
//!
//! The dump starts with a header shared by both dialects and continues with a
//! body whose grammar depends on the header's `Version` field:
//!
//! ```text
//! LUKS header information            <- banner
//! Version:        2                  <- header fields (zero indentation)
//! UUID:           cfbcc942-...
//!
//! Keyslots:                          <- LUKS2 section
//!   0: luks2                         <- entry (index: type)
//!         Key:        512 bits       <- entry attributes
//!
//! Key Slot 0: ENABLED                <- LUKS1 slot (label: status)
//!         Iterations:  2099250       <- slot attributes
//! ```
//!
//! Structure comes from indentation alone, so the grammars are written against
//! [`combinators::indented_block`], which pins a group of lines to one column.

pub mod combinators;
pub mod header;
pub mod luks1;
pub mod luks2;

use chumsky::prelude::*;

use crate::luksdump::ast::Body;
use combinators::ParserError;

/// Any body, LUKS2 attempted first.
///
/// The LUKS1 shape (`label: status` plus an indented map) also matches a LUKS2
/// section whose entries carry no attributes, so the more specific grammar has
/// to get the first chance.
pub fn any_body(
    min_luks2_sections: usize,
    continuation_indent: usize,
) -> impl Parser<char, Body, Error = ParserError> + Clone {
    luks2::body(min_luks2_sections, continuation_indent)
        .map(Body::Luks2)
        .then_ignore(end())
        .or(luks1::body(continuation_indent)
            .map(Body::Luks1)
            .then_ignore(end()))
}
