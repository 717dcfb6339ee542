//! Testing utilities for dump assertions
//!
//! This module provides a fluent API for asserting on parsed trees, plus the
//! verified sample dumps every parser test should start from.
//!
//! # Example
//!
//! ```rust
//! use luksdump::luksdump::testing::{assert_dump, Samples};
//!
//! let tree = Samples::luks2().parse();
//!
//! assert_dump(&tree)
//!     .version("2")
//!     .section("Keyslots", |section| {
//!         section.entry_count(3).entry("0", |entry| {
//!             entry.entry_type("luks2").attr("PBKDF", "argon2id");
//!         });
//!     });
//! ```

mod assertions;
mod samples;

pub use assertions::{assert_dump, DumpAssertion, EntryAssertion, SectionAssertion};
pub use samples::{Sample, Samples};
