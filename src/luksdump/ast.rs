//! Dump tree data model
//!
//! A parsed dump is a [`DumpTree`]: the [`Header`] attribute map plus a [`Body`]
//! whose shape depends on the LUKS version declared in that header.
//!
//! ```text
//! DumpTree
//! ├─ header: Version, UUID, ...
//! └─ body
//!    ├─ Luks1: [Entry "Key Slot 0" (status), Entry "Key Slot 1", ...]
//!    └─ Luks2: [Section "Keyslots" [Entry "0" (type), ...], Section "Tokens", ...]
//! ```
//!
//! Trees are built once by the parser and never mutated afterwards; the
//! builder-style methods here are crate-private.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Top-level label under which the header is addressed.
pub const HEADER_LABEL: &str = "header";

/// Ordered attribute map with unique keys.
///
/// Inserting a key that already exists replaces the value in place, so the key
/// keeps the position of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    pairs: Vec<(String, String)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AttributeMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The label printed after an entry's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryTag {
    /// LUKS2 subtype, e.g. `luks2`, `systemd-tpm2`, `pbkdf2`, `crypt`.
    Type(String),
    /// LUKS1 key slot state, `ENABLED` or `DISABLED`.
    Status(String),
}

impl EntryTag {
    /// Attribute name the tag is exposed under.
    pub fn name(&self) -> &'static str {
        match self {
            EntryTag::Type(_) => "type",
            EntryTag::Status(_) => "status",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            EntryTag::Type(v) | EntryTag::Status(v) => v,
        }
    }
}

/// One indexed sub-record: a LUKS1 key slot or an item of a LUKS2 section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub index: String,
    pub tag: EntryTag,
    pub attributes: AttributeMap,
}

impl Entry {
    pub fn new(index: impl Into<String>, tag: EntryTag, attributes: AttributeMap) -> Self {
        Self {
            index: index.into(),
            tag,
            attributes,
        }
    }

    /// Looks up an attribute, resolving `type`/`status` to the entry tag.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == self.tag.name() {
            return Some(self.tag.value());
        }
        self.attributes.get(key)
    }

    pub fn entry_type(&self) -> Option<&str> {
        match &self.tag {
            EntryTag::Type(t) => Some(t),
            EntryTag::Status(_) => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match &self.tag {
            EntryTag::Status(s) => Some(s),
            EntryTag::Type(_) => None,
        }
    }

    /// Attributes with the tag appended under `type` or `status`.
    pub fn to_map(&self) -> AttributeMap {
        let mut map = self.attributes.clone();
        map.insert(self.tag.name(), self.tag.value());
        map
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// A named LUKS2 group of entries (`Keyslots`, `Tokens`, `Digests`, `Data segments`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    entries: Vec<Entry>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries: dedup_by_index(entries),
        }
    }

    pub fn get(&self, index: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.index == index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.index, entry)?;
        }
        map.end()
    }
}

/// Later entries with an already seen index replace the earlier one in place.
pub(crate) fn dedup_by_index(entries: Vec<Entry>) -> Vec<Entry> {
    let mut result: Vec<Entry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match result.iter_mut().find(|e| e.index == entry.index) {
            Some(existing) => *existing = entry,
            None => result.push(entry),
        }
    }
    result
}

/// On-disk format version declared by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Version {
    Luks1,
    Luks2,
}

impl Version {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Version::Luks1),
            "2" => Some(Version::Luks2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Luks1 => "1",
            Version::Luks2 => "2",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LUKS{}", self.as_str())
    }
}

/// Header attribute map; always carries `Version` and `UUID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    version: Version,
    attributes: AttributeMap,
}

impl Header {
    pub(crate) fn new(version: Version, attributes: AttributeMap) -> Self {
        Self {
            version,
            attributes,
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn uuid(&self) -> &str {
        self.attributes.get("UUID").unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

/// Dialect-specific remainder of the dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Flat `Key Slot N` entries, no section wrapper.
    Luks1(Vec<Entry>),
    /// Named sections of typed entries.
    Luks2(Vec<Section>),
}

impl Body {
    pub fn version(&self) -> Version {
        match self {
            Body::Luks1(_) => Version::Luks1,
            Body::Luks2(_) => Version::Luks2,
        }
    }
}

/// A node addressed by a top-level label of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Header(&'a Header),
    Section(&'a Section),
    Slot(&'a Entry),
}

impl<'a> Node<'a> {
    pub fn as_header(&self) -> Option<&'a Header> {
        match self {
            Node::Header(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&'a Section> {
        match self {
            Node::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_slot(&self) -> Option<&'a Entry> {
        match self {
            Node::Slot(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of parsing one dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpTree {
    header: Header,
    body: Body,
}

impl DumpTree {
    pub(crate) fn new(header: Header, body: Body) -> Self {
        Self { header, body }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn version(&self) -> Version {
        self.header.version()
    }

    pub fn uuid(&self) -> &str {
        self.header.uuid()
    }

    /// Looks up a top-level label: `header`, a section name, or a slot label.
    pub fn get(&self, label: &str) -> Option<Node<'_>> {
        if label == HEADER_LABEL {
            return Some(Node::Header(&self.header));
        }
        match &self.body {
            Body::Luks1(slots) => slots.iter().find(|e| e.index == label).map(Node::Slot),
            Body::Luks2(sections) => sections
                .iter()
                .find(|s| s.name == label)
                .map(Node::Section),
        }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.get(name).and_then(|n| n.as_section())
    }

    pub fn slot(&self, label: &str) -> Option<&Entry> {
        self.get(label).and_then(|n| n.as_slot())
    }

    /// LUKS1 key slots; empty for LUKS2 trees.
    pub fn slots(&self) -> &[Entry] {
        match &self.body {
            Body::Luks1(slots) => slots,
            Body::Luks2(_) => &[],
        }
    }

    /// LUKS2 sections; empty for LUKS1 trees.
    pub fn sections(&self) -> &[Section] {
        match &self.body {
            Body::Luks2(sections) => sections,
            Body::Luks1(_) => &[],
        }
    }

    /// Top-level labels in source order, starting with `header`.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = vec![HEADER_LABEL];
        match &self.body {
            Body::Luks1(slots) => labels.extend(slots.iter().map(|e| e.index.as_str())),
            Body::Luks2(sections) => labels.extend(sections.iter().map(|s| s.name.as_str())),
        }
        labels
    }
}

impl Serialize for DumpTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(HEADER_LABEL, &self.header)?;
        match &self.body {
            Body::Luks1(slots) => {
                for slot in slots {
                    map.serialize_entry(&slot.index, slot)?;
                }
            }
            Body::Luks2(sections) => {
                for section in sections {
                    map.serialize_entry(&section.name, section)?;
                }
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(label: &str, status: &str) -> Entry {
        Entry::new(label, EntryTag::Status(status.into()), AttributeMap::new())
    }

    #[test]
    fn test_attribute_map_replaces_in_place() {
        let mut map = AttributeMap::new();
        map.insert("Iterations", "2099250");
        map.insert("Salt", "de ad be ef");
        map.insert("Key material offset", "8");
        map.insert("Salt", "ca fe ba be");

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("Salt"), Some("ca fe ba be"));
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["Iterations", "Salt", "Key material offset"]
        );
    }

    #[test]
    fn test_entry_tag_is_exposed_as_attribute() {
        let attrs: AttributeMap = [("Key", "512 bits")].into_iter().collect();
        let entry = Entry::new("0", EntryTag::Type("luks2".into()), attrs);

        assert_eq!(entry.get("type"), Some("luks2"));
        assert_eq!(entry.get("status"), None);
        assert_eq!(entry.entry_type(), Some("luks2"));
        let merged = entry.to_map();
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["Key", "type"]);
    }

    #[test]
    fn test_section_dedups_by_index() {
        let section = Section::new(
            "Tokens",
            vec![
                Entry::new("0", EntryTag::Type("a".into()), AttributeMap::new()),
                Entry::new("1", EntryTag::Type("b".into()), AttributeMap::new()),
                Entry::new("0", EntryTag::Type("c".into()), AttributeMap::new()),
            ],
        );
        assert_eq!(section.len(), 2);
        assert_eq!(section.get("0").and_then(|e| e.entry_type()), Some("c"));
    }

    #[test]
    fn test_tree_lookup_by_label() {
        let header = Header::new(
            Version::Luks1,
            [("Version", "1"), ("UUID", "abc-123")].into_iter().collect(),
        );
        let tree = DumpTree::new(
            header,
            Body::Luks1(vec![slot("Key Slot 0", "ENABLED"), slot("Key Slot 1", "DISABLED")]),
        );

        assert_eq!(tree.labels(), vec!["header", "Key Slot 0", "Key Slot 1"]);
        assert_eq!(tree.uuid(), "abc-123");
        assert!(tree.get("header").and_then(|n| n.as_header()).is_some());
        assert_eq!(
            tree.slot("Key Slot 1").and_then(|e| e.status()),
            Some("DISABLED")
        );
        assert!(tree.section("Keyslots").is_none());
        assert!(tree.sections().is_empty());
    }

    #[test]
    fn test_version_from_field() {
        assert_eq!(Version::from_field("1"), Some(Version::Luks1));
        assert_eq!(Version::from_field("2"), Some(Version::Luks2));
        assert_eq!(Version::from_field("3"), None);
        assert_eq!(Version::Luks2.to_string(), "LUKS2");
    }
}
