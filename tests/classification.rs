//! Outcome classification: not applicable versus parse errors

use luksdump::luksdump::normalize::normalize;
use luksdump::luksdump::{DumpError, NotApplicable, ParseError};
use luksdump::parse;
use rstest::rstest;

#[rstest]
#[case("")]
#[case("\n")]
#[case("  \n \n")]
fn test_empty_input_is_not_applicable(#[case] text: &str) {
    assert_eq!(
        parse(text).unwrap_err(),
        DumpError::NotApplicable(NotApplicable::EmptyInput)
    );
}

#[rstest]
#[case("Device /dev/sdb is not a valid LUKS device.")]
#[case("sh: cryptsetup: command not found")]
#[case("Device luks-root is not initialized.")]
fn test_tool_diagnostic_is_not_applicable(#[case] line: &str) {
    let err = parse(&normalize(line)).unwrap_err();
    assert!(err.is_not_applicable(), "{:?}", err);
    assert!(!matches!(err, DumpError::Parse(_)));
}

#[rstest]
#[case("3")]
#[case("2.1")]
#[case("LUKS3")]
fn test_unknown_version_is_a_parse_error(#[case] version: &str) {
    let text = format!(
        "LUKS header information\nVersion: {}\nUUID: abc\nLabel: x\n\nKeyslots:\n",
        version
    );
    assert_eq!(
        parse(&text).unwrap_err(),
        DumpError::Parse(ParseError::UnsupportedVersion(version.to_string()))
    );
}

#[test]
fn test_missing_version_is_a_parse_error() {
    let text = "LUKS header information\nUUID: abc\n\nKeyslots:\n";
    assert_eq!(
        parse(text).unwrap_err(),
        DumpError::Parse(ParseError::MissingField("Version"))
    );
}

#[test]
fn test_missing_uuid_is_a_parse_error() {
    let text = "LUKS header information\nVersion: 2\n\nKeyslots:\n";
    assert_eq!(
        parse(text).unwrap_err(),
        DumpError::Parse(ParseError::MissingField("UUID"))
    );
}

#[rstest]
#[case::no_banner("Version: 2\nUUID: abc\n\nKeyslots:\n")]
#[case::truncated_entry("LUKS header information\nVersion: 2\nUUID: abc\n\nKeyslots:\n  0: luks2\n        Key")]
#[case::stray_indent("LUKS header information\nVersion: 1\nUUID: abc\n\nKey Slot 0: ENABLED\n        Iterations: 1\n   Salt: x\n")]
#[case::garbage("hello\nworld\n")]
fn test_malformed_input_is_a_syntax_error(#[case] text: &str) {
    let err = parse(text).unwrap_err();
    assert!(
        matches!(err, DumpError::Parse(ParseError::Syntax { .. })),
        "{:?}",
        err
    );
}

#[test]
fn test_syntax_error_reports_a_position() {
    let text = "LUKS header information\nVersion: 1\nUUID: abc\n\nKey Slot 0: ENABLED\n        Iterations: 1\n   Salt: x\n";
    match parse(text).unwrap_err() {
        DumpError::Parse(ParseError::Syntax { line, .. }) => assert_eq!(line, 7),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_luks1_header_over_luks2_body_is_a_syntax_error() {
    let text = "LUKS header information\nVersion: 1\nUUID: abc\n\nKeyslots:\n  0: luks2\n        Key: 512 bits\nTokens:\n";
    match parse(text).unwrap_err() {
        DumpError::Parse(ParseError::Syntax { line, .. }) => assert_eq!(line, 5),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_luks2_header_over_luks1_body_is_a_syntax_error() {
    let text = "LUKS header information\nVersion: 2\nUUID: abc\n\nKey Slot 0: ENABLED\n        Iterations: 10\n";
    assert!(matches!(
        parse(text).unwrap_err(),
        DumpError::Parse(ParseError::Syntax { .. })
    ));
}

#[rstest]
#[case::foreign_key("Cipher: aes\n")]
#[case::missing_status("Key Slot 0:\n")]
#[case::blank_status("Key Slot 1: DISABLED\nKey Slot 2:    \n")]
#[case::no_slot_number("Key Slot: ENABLED\n")]
fn test_luks1_body_rejects_lines_that_are_not_slots(#[case] body: &str) {
    let text = format!("LUKS header information\nVersion: 1\nUUID: abc\n\n{}", body);
    assert!(
        matches!(parse(&text).unwrap_err(), DumpError::Parse(ParseError::Syntax { .. })),
        "{:?}",
        body
    );
}
