//! Error types for dump parsing
//!
//! A parse call has exactly two outcomes besides success:
//! [`DumpError::NotApplicable`] when the input carries nothing to structure, and
//! [`DumpError::Parse`] when it looked like a dump but matched neither dialect.

use chumsky::error::{Simple, SimpleReason};

/// Why an input was classified as not worth parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotApplicable {
    /// Nothing but whitespace.
    #[error("empty input")]
    EmptyInput,
    /// The tool's own one-line diagnostic, e.g. "Device /dev/sda is not a valid LUKS device."
    #[error("tool diagnostic: {0}")]
    Diagnostic(String),
}

/// The input did not conform to either dump dialect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}: found {found}, {expected}")]
    Syntax {
        line: usize,
        column: usize,
        found: String,
        expected: String,
    },
    #[error("header is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("unsupported LUKS version `{0}`")]
    UnsupportedVersion(String),
}

impl ParseError {
    /// Converts the furthest grammar failure into a positioned error.
    ///
    /// `offset` is the char offset of the parsed slice within `source`.
    pub(crate) fn from_simple(errors: Vec<Simple<char>>, source: &str, offset: usize) -> Self {
        let furthest = errors.into_iter().max_by_key(|e| e.span().start);
        let Some(error) = furthest else {
            return ParseError::Syntax {
                line: 1,
                column: 1,
                found: "nothing".to_string(),
                expected: "a LUKS header".to_string(),
            };
        };

        let (line, column) = line_column(source, offset + error.span().start);
        let found = match error.found().copied() {
            Some('\n') => "end of line".to_string(),
            Some(c) => format!("{:?}", c),
            None => "end of input".to_string(),
        };
        let expected = match error.reason() {
            SimpleReason::Custom(msg) => msg.clone(),
            _ => describe_expected(&error),
        };

        ParseError::Syntax {
            line,
            column,
            found,
            expected,
        }
    }
}

fn describe_expected(error: &Simple<char>) -> String {
    let mut expected: Vec<String> = error
        .expected()
        .map(|e| match *e {
            Some('\n') => "end of line".to_string(),
            Some(c) => format!("{:?}", c),
            None => "end of input".to_string(),
        })
        .collect();
    expected.sort();
    expected.dedup();
    if expected.is_empty() {
        "unexpected input".to_string()
    } else {
        format!("expected one of {}", expected.join(", "))
    }
}

/// 1-based line and column of a char offset.
fn line_column(source: &str, char_offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for c in source.chars().take(char_offset) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Everything a parse call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DumpError {
    #[error("not applicable: {0}")]
    NotApplicable(#[from] NotApplicable),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl DumpError {
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, DumpError::NotApplicable(_))
    }
}
