//! Parser combinator functions shared by the header and body grammars.
//!
//! All parsers work on normalized text (tabs already expanded), one `char` at a
//! time. Chumsky backtracks fully, so a rule that fails after consuming input
//! leaves the stream where it found it; `repeated`, `or_not` and `or` rely on
//! that to end a group cleanly instead of failing the whole parse.

use chumsky::prelude::*;

use crate::luksdump::ast::AttributeMap;
use crate::luksdump::continuation;

/// Type alias for parser error
pub type ParserError = Simple<char>;

/// Printable characters, minus the line terminators.
pub(crate) fn is_value_char(c: char) -> bool {
    c != '\n' && c != '\r' && (c == '\t' || !c.is_control())
}

pub(crate) fn newline() -> impl Parser<char, (), Error = ParserError> + Clone {
    just('\n').ignored()
}

/// Spaces or tabs inside a line.
pub(crate) fn inline_ws() -> impl Parser<char, (), Error = ParserError> + Clone {
    filter(|c: &char| *c == ' ' || *c == '\t')
        .repeated()
        .ignored()
}

/// Zero or more empty (or whitespace-only) lines.
pub(crate) fn blank_lines() -> impl Parser<char, (), Error = ParserError> + Clone {
    inline_ws().then(newline()).repeated().ignored()
}

/// Leading spaces of a line, as a column.
pub(crate) fn indentation() -> impl Parser<char, usize, Error = ParserError> + Clone {
    just(' ').repeated().map(|spaces: Vec<char>| spaces.len())
}

/// Exactly `n` spaces.
pub(crate) fn spaces(n: usize) -> impl Parser<char, (), Error = ParserError> + Clone {
    just(' ').repeated().exactly(n).ignored()
}

/// Rest of the line, possibly empty. The line break is not consumed.
pub(crate) fn text() -> impl Parser<char, String, Error = ParserError> + Clone {
    filter(|c: &char| is_value_char(*c))
        .repeated()
        .collect::<String>()
}

/// Rest of the line, which must contain something other than whitespace.
pub(crate) fn non_blank_text() -> impl Parser<char, String, Error = ParserError> + Clone {
    text().try_map(|s, span| {
        if s.trim().is_empty() {
            Err(Simple::custom(span, "expected a value"))
        } else {
            Ok(s)
        }
    })
}

/// Attribute name up to (and consuming) the colon.
///
/// The first character may not be whitespace, which is what pins a key to the
/// column its line's indentation was measured at.
pub(crate) fn key() -> impl Parser<char, String, Error = ParserError> + Clone {
    filter(|c: &char| is_value_char(*c) && *c != ':' && !c.is_whitespace())
        .chain(filter(|c: &char| is_value_char(*c) && *c != ':').repeated())
        .collect::<String>()
        .then_ignore(just(':'))
        .map(|key| key.trim_end().to_string())
}

/// A value that ends its line, continued by lines indented exactly `continuation_indent`.
///
/// This is the layout of zero- and first-level fields, where the tool wraps
/// long byte strings under a fixed column (`"MK salt:"` in LUKS1 headers).
pub(crate) fn line_value(
    continuation_indent: usize,
) -> impl Parser<char, String, Error = ParserError> + Clone {
    let continued = spaces(continuation_indent)
        .ignore_then(non_blank_text())
        .then_ignore(newline());

    inline_ws()
        .ignore_then(text())
        .then_ignore(newline())
        .then(continued.repeated())
        .map(|(first, rest)| continuation::join(std::iter::once(first).chain(rest)))
}

/// A value continued by any following lines indented deeper than `column`.
///
/// `column` is the column of the enclosing [`indented_block`], i.e. where the
/// key starts. The first line may be empty when the value starts on the
/// following line.
pub(crate) fn hanging_value(column: usize) -> impl Parser<char, String, Error = ParserError> + Clone {
    let deeper = indentation().try_map(move |depth, span| {
        if depth > column {
            Ok(depth)
        } else {
            Err(Simple::custom(
                span,
                format!("expected a continuation deeper than column {}", column),
            ))
        }
    });
    let continued = deeper
        .ignore_then(non_blank_text())
        .then_ignore(newline());

    inline_ws()
        .ignore_then(text())
        .then_ignore(newline())
        .then(continued.repeated())
        .map(|(first, rest)| continuation::join(std::iter::once(first).chain(rest)))
}

/// Indentation-scoped group of lines.
///
/// The first line fixes the group's column, which has to be deeper than
/// `parent`; every further line must start at exactly that column. A line that
/// is shallower or deeper ends the group. `item` receives the column and parses
/// one line (plus whatever it nests) after the indentation.
pub(crate) fn indented_block<O, P, F>(
    parent: usize,
    item: F,
) -> BoxedParser<'static, char, Vec<O>, ParserError>
where
    O: 'static,
    P: Parser<char, O, Error = ParserError> + Clone + 'static,
    F: Fn(usize) -> P + Clone + 'static,
{
    indentation()
        .try_map(move |depth, span| {
            if depth > parent {
                Ok(depth)
            } else {
                Err(Simple::custom(
                    span,
                    format!("expected indentation deeper than column {}", parent),
                ))
            }
        })
        .then_with(move |column| {
            item(column)
                .then(spaces(column).ignore_then(item(column)).repeated())
                .map(|(first, rest)| std::iter::once(first).chain(rest).collect::<Vec<O>>())
                .boxed()
        })
        .boxed()
}

/// Nested `Key: value` lines below a line at `parent`; empty when nothing is nested.
pub(crate) fn attribute_block(
    parent: usize,
) -> impl Parser<char, AttributeMap, Error = ParserError> + Clone {
    indented_block(parent, |column| key().then(hanging_value(column)))
        .or_not()
        .map(|pairs| pairs.unwrap_or_default().into_iter().collect())
}
