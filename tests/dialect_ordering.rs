//! Headerless bodies and the order in which dialects are tried

use luksdump::luksdump::Body;
use luksdump::{parse_body, ParseOptions};

#[test]
fn test_section_without_attributes_is_luks2() {
    let body = parse_body("Tokens:\n  0: systemd-tpm2\n", &ParseOptions::default())
        .expect("body to parse");

    match body {
        Body::Luks2(sections) => {
            assert_eq!(sections.len(), 1);
            assert_eq!(sections[0].name, "Tokens");
            assert_eq!(
                sections[0].get("0").and_then(|e| e.entry_type()),
                Some("systemd-tpm2")
            );
        }
        Body::Luks1(_) => panic!("a section body was read as key slots"),
    }
}

#[test]
fn test_key_slots_fall_back_to_luks1() {
    let text = "Key Slot 0: ENABLED\n        Iterations: 10\nKey Slot 1: DISABLED\n";
    let body = parse_body(text, &ParseOptions::default()).expect("body to parse");

    match body {
        Body::Luks1(slots) => {
            assert_eq!(slots.len(), 2);
            assert_eq!(slots[0].status(), Some("ENABLED"));
            assert_eq!(slots[0].attributes.get("Iterations"), Some("10"));
            assert_eq!(slots[1].status(), Some("DISABLED"));
        }
        Body::Luks2(_) => panic!("key slots were read as sections"),
    }
}

#[test]
fn test_empty_body_needs_min_sections_of_zero() {
    let strict = ParseOptions::default();
    let lenient = ParseOptions {
        min_luks2_sections: 0,
        ..ParseOptions::default()
    };

    assert_eq!(parse_body("", &lenient).unwrap(), Body::Luks2(Vec::new()));
    // With no sections allowed to be missing, an empty body can only be LUKS1.
    assert_eq!(parse_body("", &strict).unwrap(), Body::Luks1(Vec::new()));
}

#[test]
fn test_unparsable_body_is_an_error() {
    assert!(parse_body("  0: luks2\n", &ParseOptions::default()).is_err());
}

#[test]
fn test_lines_that_are_neither_sections_nor_slots_are_rejected() {
    let options = ParseOptions::default();

    assert!(parse_body("Cipher: aes\n", &options).is_err());
    assert!(parse_body("Key Slot 0: ENABLED\nCipher: aes\n", &options).is_err());
}

#[test]
fn test_slot_without_status_is_rejected() {
    let strict = ParseOptions::default();
    let lenient = ParseOptions {
        min_luks2_sections: 0,
        ..ParseOptions::default()
    };

    assert!(parse_body("Key Slot 0:\n", &strict).is_err());
    assert!(parse_body("Key Slot 0:\n", &lenient).is_err());
    assert!(parse_body("Key Slot 0: DISABLED\nKey Slot 1:\n", &strict).is_err());
}
