//! Continuation-line joining
//!
//! Long values (hex byte groups, salts, digests) wrap over several physical
//! lines. The grammar hands the fragments it collected to [`join`], which
//! rebuilds the single logical value.

/// Joins value fragments with single spaces and trims the result.
///
/// Blank fragments are dropped, so a key whose value starts on the following
/// line (`tpm2-policy-hash:` with nothing after the colon) joins cleanly.
pub fn join<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut value = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref().trim();
        if fragment.is_empty() {
            continue;
        }
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(fragment);
    }
    value
}
