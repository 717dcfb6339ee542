//! # luksdump
//!
//! A parser for the output of `cryptsetup luksDump`.
//!
//! The dump is turned into an immutable [`DumpTree`](luksdump::ast::DumpTree): a
//! header attribute map plus either LUKS1 key slots or LUKS2 sections.
//!
//! ## Testing
//!
//! Parser tests use the embedded sample dumps and the fluent assertions in the
//! [testing module](luksdump::testing).

pub mod luksdump;

pub use luksdump::parser::{parse, parse_body, parse_with, ParseOptions};
