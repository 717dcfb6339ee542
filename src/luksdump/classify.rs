//! Not-applicable detection
//!
//! Some inputs are expected to carry nothing worth structuring: the device was
//! empty, the tool is missing, or the device is not LUKS at all. Those are
//! recognized before any grammar runs so they never surface as parse errors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::luksdump::error::NotApplicable;

/// The tool's own diagnostics for inputs that have no dump.
static DIAGNOSTIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)not a valid LUKS device|command not found|not initialized").unwrap()
});

/// Returns why `text` should not be parsed, or `None` when it should.
pub fn not_applicable(text: &str) -> Option<NotApplicable> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(NotApplicable::EmptyInput);
    }
    if !trimmed.contains('\n') && DIAGNOSTIC.is_match(trimmed) {
        return Some(NotApplicable::Diagnostic(trimmed.to_string()));
    }
    None
}
