//! Line normalization
//!
//! The grammar measures indentation in spaces, so raw tool output has to be
//! normalized first: lines are joined with `\n`, every tab becomes a fixed run
//! of spaces (not a tab stop), and a trailing newline is appended.
//!
//! The fixed run matters: the tool prints `"MK salt:       \t"` and wraps the
//! value under `"               \t"`, which only lands on a stable column when
//! each tab is replaced by the same number of spaces.

use serde::Deserialize;

/// Default number of spaces a tab expands to.
pub const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub tab_width: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            tab_width: TAB_WIDTH,
        }
    }
}

/// Normalizes already split lines.
pub fn normalize_lines<I, S>(lines: I, config: &NormalizeConfig) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tab = " ".repeat(config.tab_width);
    let mut result = String::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            result.push('\n');
        }
        result.push_str(&line.as_ref().replace('\t', &tab));
    }
    result.push('\n');
    result
}

/// Normalizes a raw blob, e.g. the captured stdout of `cryptsetup luksDump`.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, &NormalizeConfig::default())
}

pub fn normalize_with(raw: &str, config: &NormalizeConfig) -> String {
    normalize_lines(raw.lines(), config)
}
