use nametagkit_core::{NameValidator, ValidationReason, MAX_NAME_LENGTH};
use proptest::prelude::*;

#[test]
fn test_rejects_before_generation() {
    let validator = NameValidator::default();
    let err = validator.validate("OK\nTOO-LONG-NAME-HERE").unwrap_err();
    assert_eq!(err.line_number, 2);
    assert_eq!(err.reason.code(), "tooLong");
}

#[test]
fn test_validate_list() {
    let validator = NameValidator::default();
    let names = validator.validate_list(&["alice", "BOB"]).unwrap();
    assert_eq!(names.len(), 2);
    assert_eq!(names[0].as_str(), "ALICE");

    let err = validator.validate_list(&["ALICE", "JOHN_DOE"]).unwrap_err();
    assert_eq!(err.line_number, 2);
    assert!(matches!(err.reason, ValidationReason::InvalidChars { .. }));
}

proptest! {
    #[test]
    fn prop_allowed_names_validate(name in "[A-Z0-9][A-Z0-9 -]{0,12}[A-Z0-9]") {
        let names = NameValidator::default().validate(&name).unwrap();
        prop_assert_eq!(names.len(), 1);
        prop_assert_eq!(names[0].as_str(), name.as_str());
    }

    #[test]
    fn prop_overlong_names_fail(name in "[A-Z]{15,30}") {
        let err = NameValidator::default().validate(&name).unwrap_err();
        prop_assert_eq!(err.reason, ValidationReason::TooLong {
            length: name.len(),
            max: MAX_NAME_LENGTH,
        });
    }

    #[test]
    fn prop_disallowed_char_fails(prefix in "[A-Z]{1,5}", bad in "[_!@#.,]") {
        let raw = format!("{}{}", prefix, bad);
        let err = NameValidator::default().validate(&raw).unwrap_err();
        prop_assert_eq!(err.reason.code(), "invalidChars");
    }
}
