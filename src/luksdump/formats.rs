//! Output formats for dump trees
//!
//! JSON and YAML go through the trees' `Serialize` impls and keep source order.
//! Treeviz is a compact, human-readable outline:
//!
//! ```text
//! ├─ header: LUKS2 cfbcc942-e06b-4c4a-952f-e9c9b2011c27
//! │ ├─ Version: 2
//! │ └─ UUID: cfbcc942-e06b-4c4a-952f-e9c9b2011c27
//! └─ section: Keyslots
//!   └─ 0: luks2
//!     └─ Key: 512 bits
//! ```

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::luksdump::ast::{AttributeMap, Body, DumpTree, Entry, HEADER_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Treeviz,
}

impl OutputFormat {
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Yaml, OutputFormat::Treeviz]
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Treeviz => "treeviz",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::all()
            .iter()
            .find(|f| f.name() == s)
            .copied()
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("unknown output format `{0}` (expected json, yaml or treeviz)")]
    UnknownFormat(String),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serializes one tree in the requested format.
pub fn serialize(tree: &DumpTree, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tree)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(tree)?),
        OutputFormat::Treeviz => Ok(to_treeviz_str(tree)),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(tree: &DumpTree) -> String {
    let mut result = String::new();
    let header = tree.header();
    let body_len = match tree.body() {
        Body::Luks1(slots) => slots.len(),
        Body::Luks2(sections) => sections.len(),
    };

    append_line(
        &mut result,
        "",
        body_len == 0,
        &format!("{}: {} {}", HEADER_LABEL, header.version(), header.uuid()),
    );
    append_attributes(&mut result, header.attributes(), &child_prefix("", body_len == 0));

    match tree.body() {
        Body::Luks1(slots) => {
            for (i, slot) in slots.iter().enumerate() {
                append_entry(&mut result, slot, "", i == slots.len() - 1);
            }
        }
        Body::Luks2(sections) => {
            for (i, section) in sections.iter().enumerate() {
                let is_last = i == sections.len() - 1;
                append_line(&mut result, "", is_last, &format!("section: {}", section.name));
                let prefix = child_prefix("", is_last);
                let entries = section.entries();
                for (j, entry) in entries.iter().enumerate() {
                    append_entry(&mut result, entry, &prefix, j == entries.len() - 1);
                }
            }
        }
    }
    result
}

fn child_prefix(prefix: &str, is_last: bool) -> String {
    format!("{}{}", prefix, if is_last { "  " } else { "│ " })
}

fn append_line(result: &mut String, prefix: &str, is_last: bool, label: &str) {
    let connector = if is_last { "└─" } else { "├─" };
    result.push_str(&format!("{}{} {}\n", prefix, connector, label));
}

fn append_entry(result: &mut String, entry: &Entry, prefix: &str, is_last: bool) {
    append_line(
        result,
        prefix,
        is_last,
        &format!("{}: {}", entry.index, entry.tag.value()),
    );
    append_attributes(result, &entry.attributes, &child_prefix(prefix, is_last));
}

fn append_attributes(result: &mut String, attributes: &AttributeMap, prefix: &str) {
    let len = attributes.len();
    for (i, (key, value)) in attributes.iter().enumerate() {
        append_line(
            result,
            prefix,
            i == len - 1,
            &format!("{}: {}", key, truncate(value, 30)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luksdump::parser::parse;

    const DUMP: &str = "LUKS header information\nVersion: 2\nUUID: abc\n\nKeyslots:\n  0: luks2\n        Key: 512 bits\n";

    #[test]
    fn test_format_names_round_trip() {
        for format in OutputFormat::all() {
            assert_eq!(format.name().parse::<OutputFormat>().unwrap(), *format);
        }
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_treeviz() {
        let tree = parse(DUMP).unwrap();
        let expected = "\
├─ header: LUKS2 abc
│ ├─ Version: 2
│ └─ UUID: abc
└─ section: Keyslots
  └─ 0: luks2
    └─ Key: 512 bits
";
        assert_eq!(to_treeviz_str(&tree), expected);
    }

    #[test]
    fn test_json_keeps_source_order() {
        let tree = parse(DUMP).unwrap();
        let json = serialize(&tree, OutputFormat::Json).unwrap();
        insta::assert_snapshot!(json, @r###"
        {
          "header": {
            "Version": "2",
            "UUID": "abc"
          },
          "Keyslots": {
            "0": {
              "Key": "512 bits",
              "type": "luks2"
            }
          }
        }
        "###);
    }

    #[test]
    fn test_yaml() {
        let tree = parse(DUMP).unwrap();
        let yaml = serialize(&tree, OutputFormat::Yaml).unwrap();
        assert!(yaml.starts_with("header:\n  Version: '2'\n  UUID: abc\n"));
        assert!(yaml.contains("Keyslots:\n  '0':\n    Key: 512 bits\n    type: luks2\n"));
    }

    #[test]
    fn test_truncate_long_values() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
