//! Collections of parsed dumps
//!
//! A host usually has several encrypted devices and one dump per device. A
//! failure on one of them must never abort the others: not-applicable inputs
//! are dropped quietly, parse failures are logged and skipped.

use crate::luksdump::ast::{DumpTree, Version};
use crate::luksdump::error::DumpError;
use crate::luksdump::parser::{parse_with, ParseOptions};

/// Directory through which devices are addressed by UUID.
pub const BY_UUID_DIR: &str = "/dev/disk/by-uuid/";

/// An input that was skipped because it failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub source: String,
    pub error: DumpError,
}

/// Successfully parsed dumps, in input order.
#[derive(Debug, Clone, Default)]
pub struct DumpSet {
    dumps: Vec<DumpTree>,
    skipped: Vec<Skipped>,
}

impl DumpSet {
    /// Parses `(source, normalized text)` pairs, keeping what parses.
    pub fn parse_all<I, S, T>(inputs: I, options: &ParseOptions) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        let mut set = DumpSet::default();
        for (source, text) in inputs {
            let source = source.into();
            match parse_with(text.as_ref(), options) {
                Ok(tree) => set.dumps.push(tree),
                Err(DumpError::NotApplicable(reason)) => {
                    log::debug!("{}: nothing to parse ({})", source, reason);
                }
                Err(error) => {
                    log::warn!("{}: skipping unparsable dump: {}", source, error);
                    set.skipped.push(Skipped { source, error });
                }
            }
        }
        set
    }

    pub fn dumps(&self) -> &[DumpTree] {
        &self.dumps
    }

    /// Inputs that looked like dumps but failed to parse.
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.dumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dumps.is_empty()
    }

    pub fn of_version(&self, version: Version) -> impl Iterator<Item = &DumpTree> {
        self.dumps.iter().filter(move |d| d.version() == version)
    }

    /// Looks a dump up by header UUID, ignoring case.
    pub fn find_by_uuid(&self, uuid: &str) -> Option<&DumpTree> {
        self.dumps
            .iter()
            .find(|d| d.uuid().eq_ignore_ascii_case(uuid))
    }

    /// `/dev/disk/by-uuid/<UUID>` paths of every LUKS1 device.
    pub fn luks1_block_devices(&self) -> Vec<String> {
        self.of_version(Version::Luks1)
            .map(|d| format!("{}{}", BY_UUID_DIR, d.uuid()))
            .collect()
    }
}

impl FromIterator<DumpTree> for DumpSet {
    fn from_iter<T: IntoIterator<Item = DumpTree>>(iter: T) -> Self {
        DumpSet {
            dumps: iter.into_iter().collect(),
            skipped: Vec::new(),
        }
    }
}
