//! # Per-Type Validators
//!
//! One pure function per field type, each mapping an [`InputValue`] to an
//! accepted [`StoredValue`] or a [`Rejection`]:
//!
//! | Type | Accepts | Rejects |
//! |------|---------|---------|
//! | `boolean` | `true`, `false`, `1` → true, `0` → false, `null` | every other number, every other kind |
//! | `enumeration` | a member of the allowed set, `null` | non-members, non-strings |
//! | `string`/`text`/`richtext` | any string (byte-exact), `null` | non-strings, strings outside declared length bounds |
//!
//! Validators never look at `required`: null is accepted here and presence
//! is enforced by the caller, which knows whether it is creating or
//! updating.

use crate::error::Rejection;
use crate::field::{FieldDeclaration, FieldType};
use crate::value::{InputValue, StoredValue};

/// Outcome of one validator call: `Ok` is accepted, `Err` is rejected.
pub type Coercion = Result<StoredValue, Rejection>;

/// Signature shared by every field validator.
pub type Validator = fn(&FieldDeclaration, &InputValue) -> Coercion;

/// Validate a `boolean` field.
///
/// Numbers are accepted only when numerically equal to `0` or `1`, so `1.0`
/// is `true` and `2` is rejected. The comparison is on the `f64` value, so a
/// literal such as `1.0000000000000001` that rounds to `1.0` is `true`.
pub fn validate_boolean(_decl: &FieldDeclaration, input: &InputValue) -> Coercion {
    match input {
        InputValue::Null => Ok(StoredValue::Null),
        InputValue::Bool(b) => Ok(StoredValue::Boolean(*b)),
        InputValue::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Ok(StoredValue::Boolean(true)),
            Some(v) if v == 0.0 => Ok(StoredValue::Boolean(false)),
            _ => Err(Rejection::NotBooleanAlias(n.to_string())),
        },
        other => Err(Rejection::TypeMismatch {
            expected: FieldType::Boolean,
            found: other.kind(),
        }),
    }
}

/// Validate an `enumeration` field against its declared allowed set.
pub fn validate_enumeration(decl: &FieldDeclaration, input: &InputValue) -> Coercion {
    match input {
        InputValue::Null => Ok(StoredValue::Null),
        InputValue::String(s) => {
            if decl.allowed_values().iter().any(|allowed| allowed == s) {
                Ok(StoredValue::String(s.clone()))
            } else {
                Err(Rejection::NotInEnumeration {
                    value: s.clone(),
                    allowed: decl.allowed_values().to_vec(),
                })
            }
        }
        other => Err(Rejection::TypeMismatch {
            expected: FieldType::Enumeration,
            found: other.kind(),
        }),
    }
}

/// Validate a `string`, `text` or `richtext` field.
///
/// The string is stored exactly as received. A string that happens to hold
/// JSON (for instance `"\"Some string\""`) is not decoded a second time.
pub fn validate_textual(decl: &FieldDeclaration, input: &InputValue) -> Coercion {
    match input {
        InputValue::Null => Ok(StoredValue::Null),
        InputValue::String(s) => {
            check_length(decl, s)?;
            Ok(StoredValue::String(s.clone()))
        }
        other => Err(Rejection::TypeMismatch {
            expected: decl.field_type(),
            found: other.kind(),
        }),
    }
}

/// Length is counted in Unicode scalar values, not bytes.
fn check_length(decl: &FieldDeclaration, s: &str) -> Result<(), Rejection> {
    let actual = s.chars().count();
    if let Some(min) = decl.min_length() {
        if (actual as u64) < min {
            return Err(Rejection::TooShort { min, actual });
        }
    }
    if let Some(max) = decl.max_length() {
        if (actual as u64) > max {
            return Err(Rejection::TooLong { max, actual });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;
    use serde_json::json;

    fn input(v: serde_json::Value) -> InputValue {
        InputValue::from(v)
    }

    // ── boolean ──────────────────────────────────────────────────────

    #[test]
    fn boolean_accepts_native_booleans_unchanged() {
        let decl = FieldDeclaration::boolean("field");
        assert_eq!(validate_boolean(&decl, &input(json!(true))), Ok(StoredValue::Boolean(true)));
        assert_eq!(validate_boolean(&decl, &input(json!(false))), Ok(StoredValue::Boolean(false)));
    }

    #[test]
    fn boolean_converts_one_and_zero() {
        let decl = FieldDeclaration::boolean("field");
        assert_eq!(validate_boolean(&decl, &input(json!(1))), Ok(StoredValue::Boolean(true)));
        assert_eq!(validate_boolean(&decl, &input(json!(0))), Ok(StoredValue::Boolean(false)));
        assert_eq!(validate_boolean(&decl, &input(json!(1.0))), Ok(StoredValue::Boolean(true)));
    }

    #[test]
    fn boolean_compares_numbers_as_f64() {
        let decl = FieldDeclaration::boolean("field");
        let parsed = |text: &str| input(serde_json::from_str(text).unwrap());
        assert_eq!(
            validate_boolean(&decl, &parsed("1.0000000000000001")),
            Ok(StoredValue::Boolean(true))
        );
        assert_eq!(validate_boolean(&decl, &parsed("-0.0")), Ok(StoredValue::Boolean(false)));
        assert!(matches!(
            validate_boolean(&decl, &parsed("1.000001")),
            Err(Rejection::NotBooleanAlias(_))
        ));
    }

    #[test]
    fn boolean_rejects_other_numbers() {
        let decl = FieldDeclaration::boolean("field");
        for n in [json!(2), json!(-1), json!(0.5)] {
            assert!(matches!(
                validate_boolean(&decl, &input(n)),
                Err(Rejection::NotBooleanAlias(_))
            ));
        }
    }

    #[test]
    fn boolean_rejects_strings_including_true() {
        let decl = FieldDeclaration::boolean("field");
        for s in ["random", "true", "1"] {
            assert_eq!(
                validate_boolean(&decl, &input(json!(s))),
                Err(Rejection::TypeMismatch {
                    expected: FieldType::Boolean,
                    found: ValueKind::String,
                })
            );
        }
    }

    #[test]
    fn boolean_accepts_null() {
        let decl = FieldDeclaration::boolean("field");
        assert_eq!(validate_boolean(&decl, &InputValue::Null), Ok(StoredValue::Null));
    }

    // ── enumeration ──────────────────────────────────────────────────

    #[test]
    fn enumeration_accepts_members_unchanged() {
        let decl = FieldDeclaration::enumeration("field", ["one", "two"]);
        assert_eq!(validate_enumeration(&decl, &input(json!("one"))), Ok("one".into()));
        assert_eq!(validate_enumeration(&decl, &input(json!("two"))), Ok("two".into()));
    }

    #[test]
    fn enumeration_rejects_non_members() {
        let decl = FieldDeclaration::enumeration("field", ["one", "two"]);
        assert_eq!(
            validate_enumeration(&decl, &input(json!("invalid-value"))),
            Err(Rejection::NotInEnumeration {
                value: "invalid-value".into(),
                allowed: vec!["one".into(), "two".into()],
            })
        );
        // Membership is an exact match.
        assert!(validate_enumeration(&decl, &input(json!("One"))).is_err());
    }

    #[test]
    fn enumeration_accepts_null_and_rejects_non_strings() {
        let decl = FieldDeclaration::enumeration("field", ["one", "two"]);
        assert_eq!(validate_enumeration(&decl, &InputValue::Null), Ok(StoredValue::Null));
        assert!(matches!(
            validate_enumeration(&decl, &input(json!(1))),
            Err(Rejection::TypeMismatch { found: ValueKind::Number, .. })
        ));
    }

    // ── string / text / richtext ─────────────────────────────────────

    #[test]
    fn textual_preserves_newlines_and_quotes() {
        for decl in [
            FieldDeclaration::string("field"),
            FieldDeclaration::text("field"),
            FieldDeclaration::richtext("field"),
        ] {
            assert_eq!(validate_textual(&decl, &input(json!("Some\ntext"))), Ok("Some\ntext".into()));
            assert_eq!(
                validate_textual(&decl, &input(json!("\"Some string\""))),
                Ok("\"Some string\"".into())
            );
        }
    }

    #[test]
    fn textual_rejects_non_strings_naming_declared_type() {
        let decl = FieldDeclaration::richtext("field");
        assert_eq!(
            validate_textual(&decl, &input(json!(42))),
            Err(Rejection::TypeMismatch {
                expected: FieldType::Richtext,
                found: ValueKind::Number,
            })
        );
    }

    #[test]
    fn textual_enforces_declared_bounds_in_characters() {
        let decl = FieldDeclaration::string("field")
            .with_min_length(2)
            .with_max_length(3);
        assert_eq!(
            validate_textual(&decl, &input(json!("a"))),
            Err(Rejection::TooShort { min: 2, actual: 1 })
        );
        assert_eq!(
            validate_textual(&decl, &input(json!("abcd"))),
            Err(Rejection::TooLong { max: 3, actual: 4 })
        );
        // Three characters, six bytes.
        assert_eq!(validate_textual(&decl, &input(json!("éàü"))), Ok("éàü".into()));
        // Bounds do not apply to null.
        assert_eq!(validate_textual(&decl, &InputValue::Null), Ok(StoredValue::Null));
    }
}
