//! Integration tests for Error types
//!
//! Tests error construction, display, locations, and classification.

use cafelisp_foundation::{Error, ErrorKind, FormatLimit, SourceLocation, Type};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_syntax() {
    let err = Error::syntax("unclosed form");
    assert!(matches!(err.kind, ErrorKind::Syntax(_)));
    assert_eq!(format!("{err}"), "syntax error: unclosed form");
}

#[test]
fn error_type_mismatch() {
    let err = Error::type_mismatch(Type::Long, Type::String);
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: Type::Long,
            actual: Type::String
        }
    ));
    let msg = format!("{err}");
    assert!(msg.contains("long"));
    assert!(msg.contains("string"));
}

#[test]
fn error_unprintable() {
    let err = Error::unprintable(Type::Void);
    assert!(err.is_type_error());
    assert!(format!("{err}").contains("void"));
}

#[test]
fn error_limit_exceeded() {
    let err = Error::limit_exceeded(FormatLimit::CodeLength { length: 70_000 });
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(FormatLimit::CodeLength { length: 70_000 })
    ));
    assert!(format!("{err}").contains("70000"));
}

#[test]
fn error_from_io() {
    let io = std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "stream did not contain valid UTF-8",
    );
    let err: Error = io.into();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
    assert!(err.to_string().contains("valid UTF-8"));
}

// =============================================================================
// Locations
// =============================================================================

#[test]
fn errors_start_unlocated() {
    assert!(Error::syntax("x").location.is_none());
}

#[test]
fn with_location_attaches_line_text() {
    let err = Error::syntax("unterminated string")
        .with_location(SourceLocation::new(4, 9, "(print \"abc"));
    let loc = err.location.as_ref().unwrap();
    assert_eq!(loc.to_string(), "4:9");
    assert_eq!(loc.line_text, "(print \"abc");
    // The message itself does not repeat the position.
    assert_eq!(err.to_string(), "syntax error: unterminated string");
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn each_kind_has_one_class() {
    let cases = [
        (Error::syntax("x"), [true, false, false, false]),
        (Error::type_mismatch(Type::Long, Type::Void), [false, true, false, false]),
        (Error::invalid_constant("x"), [false, false, true, false]),
        (Error::internal("x"), [false, false, false, true]),
    ];
    for (err, expected) in cases {
        let actual = [
            err.is_syntax_error(),
            err.is_type_error(),
            err.is_invalid_constant(),
            err.is_internal(),
        ];
        assert_eq!(actual, expected, "{err}");
    }
}
