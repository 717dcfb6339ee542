//! Verified sample dumps, captured from `cryptsetup luksDump` with tabs intact.

use crate::luksdump::ast::DumpTree;
use crate::luksdump::error::DumpError;
use crate::luksdump::normalize::normalize;
use crate::luksdump::parser::parse;

const LUKS1: &str = include_str!("../../../samples/luks1.txt");
const LUKS2: &str = include_str!("../../../samples/luks2.txt");

/// A raw sample and its normalized form.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub name: &'static str,
    pub raw: &'static str,
}

impl Sample {
    pub fn normalized(&self) -> String {
        normalize(self.raw)
    }

    pub fn try_parse(&self) -> Result<DumpTree, DumpError> {
        parse(&self.normalized())
    }

    /// Parses the sample, panicking with the error on failure.
    pub fn parse(&self) -> DumpTree {
        match self.try_parse() {
            Ok(tree) => tree,
            Err(e) => panic!("sample {} failed to parse: {}", self.name, e),
        }
    }
}

pub struct Samples;

impl Samples {
    /// Three enabled slots, five disabled, wrapped salts and a repeated `Salt` key.
    pub fn luks1() -> Sample {
        Sample {
            name: "luks1",
            raw: LUKS1,
        }
    }

    /// Four sections, a token whose value starts on the following line.
    pub fn luks2() -> Sample {
        Sample {
            name: "luks2",
            raw: LUKS2,
        }
    }

    pub fn all() -> [Sample; 2] {
        [Self::luks1(), Self::luks2()]
    }
}
