//! Fluent assertions over dump trees.

use crate::luksdump::ast::{DumpTree, Entry, Section};

pub fn assert_dump(tree: &DumpTree) -> DumpAssertion<'_> {
    DumpAssertion { tree }
}

pub struct DumpAssertion<'a> {
    tree: &'a DumpTree,
}

impl<'a> DumpAssertion<'a> {
    /// Asserts the header's `Version` field.
    pub fn version(self, expected: &str) -> Self {
        assert_eq!(
            self.tree.header().get("Version"),
            Some(expected),
            "header version mismatch"
        );
        self
    }

    pub fn uuid(self, expected: &str) -> Self {
        assert_eq!(self.tree.uuid(), expected, "header UUID mismatch");
        self
    }

    pub fn header_field(self, key: &str, expected: &str) -> Self {
        assert_eq!(
            self.tree.header().get(key),
            Some(expected),
            "header field {:?} mismatch",
            key
        );
        self
    }

    /// Asserts the top-level labels, `header` included.
    pub fn labels(self, expected: &[&str]) -> Self {
        assert_eq!(self.tree.labels(), expected, "top-level labels mismatch");
        self
    }

    pub fn slot_count(self, expected: usize) -> Self {
        assert_eq!(self.tree.slots().len(), expected, "slot count mismatch");
        self
    }

    pub fn slot<F>(self, label: &str, f: F) -> Self
    where
        F: FnOnce(EntryAssertion<'a>),
    {
        let entry = self
            .tree
            .slot(label)
            .unwrap_or_else(|| panic!("no key slot labelled {:?}", label));
        f(EntryAssertion { entry });
        self
    }

    pub fn section<F>(self, name: &str, f: F) -> Self
    where
        F: FnOnce(SectionAssertion<'a>),
    {
        let section = self
            .tree
            .section(name)
            .unwrap_or_else(|| panic!("no section named {:?}", name));
        f(SectionAssertion { section });
        self
    }
}

pub struct SectionAssertion<'a> {
    section: &'a Section,
}

impl<'a> SectionAssertion<'a> {
    pub fn entry_count(self, expected: usize) -> Self {
        assert_eq!(
            self.section.len(),
            expected,
            "entry count mismatch in section {:?}",
            self.section.name
        );
        self
    }

    pub fn entry<F>(self, index: &str, f: F) -> Self
    where
        F: FnOnce(EntryAssertion<'a>),
    {
        let entry = self.section.get(index).unwrap_or_else(|| {
            panic!("no entry {:?} in section {:?}", index, self.section.name)
        });
        f(EntryAssertion { entry });
        self
    }
}

pub struct EntryAssertion<'a> {
    entry: &'a Entry,
}

impl EntryAssertion<'_> {
    pub fn entry_type(self, expected: &str) -> Self {
        assert_eq!(self.entry.entry_type(), Some(expected), "entry type mismatch");
        self
    }

    pub fn status(self, expected: &str) -> Self {
        assert_eq!(self.entry.status(), Some(expected), "slot status mismatch");
        self
    }

    pub fn attr(self, key: &str, expected: &str) -> Self {
        assert_eq!(
            self.entry.attributes.get(key),
            Some(expected),
            "attribute {:?} mismatch in entry {:?}",
            key,
            self.entry.index
        );
        self
    }

    pub fn attr_count(self, expected: usize) -> Self {
        assert_eq!(
            self.entry.attributes.len(),
            expected,
            "attribute count mismatch in entry {:?}",
            self.entry.index
        );
        self
    }

    pub fn no_attrs(self) -> Self {
        self.attr_count(0)
    }
}
