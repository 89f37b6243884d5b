//! # Error Hierarchy
//!
//! Structured error types for the field contract, built with `thiserror`.
//!
//! A field rejection is split in two: [`Rejection`] is the reason a single
//! value was refused, independent of where it came from, and
//! [`ValidationError`] attaches the field name so callers can report it.
//! Declaration problems (a content type that is inconsistent before any
//! value is seen) are a separate family, [`DeclarationError`].

use thiserror::Error;

use crate::field::FieldType;
use crate::value::ValueKind;

/// Top-level error type for the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CmgrError {
    /// The named field type is not one the content manager knows.
    #[error("unknown field type \"{0}\"")]
    UnknownFieldType(String),
}

/// Why a single input value was refused by a field validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The input kind cannot represent a value of the declared field type.
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        /// Declared type of the field.
        expected: FieldType,
        /// Kind of the value that was submitted.
        found: ValueKind,
    },

    /// Only `0` and `1` are accepted as numeric booleans.
    #[error("number {0} is not a boolean (only 0 and 1 are accepted)")]
    NotBooleanAlias(String),

    /// The string is not one of the declared enumeration values.
    #[error("\"{value}\" is not one of the allowed values {allowed:?}")]
    NotInEnumeration {
        /// The submitted value.
        value: String,
        /// The declared allowed set, in declaration order.
        allowed: Vec<String>,
    },

    /// A required field was absent or null.
    #[error("a value is required")]
    Required,

    /// The string is shorter than the declared `minLength`.
    #[error("length {actual} is below the minimum of {min}")]
    TooShort {
        /// Declared minimum length.
        min: u64,
        /// Length of the submitted string, in characters.
        actual: usize,
    },

    /// The string is longer than the declared `maxLength`.
    #[error("length {actual} exceeds the maximum of {max}")]
    TooLong {
        /// Declared maximum length.
        max: u64,
        /// Length of the submitted string, in characters.
        actual: usize,
    },
}

impl Rejection {
    /// Machine-readable code for the rejection, used in API error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::NotBooleanAlias(_) => "NOT_BOOLEAN_ALIAS",
            Self::NotInEnumeration { .. } => "NOT_IN_ENUMERATION",
            Self::Required => "REQUIRED",
            Self::TooShort { .. } => "TOO_SHORT",
            Self::TooLong { .. } => "TOO_LONG",
        }
    }
}

/// A rejected field value: the field name plus the reason.
///
/// This is the only validation error kind surfaced to clients. It is raised
/// once per offending field and never retried, since validation is
/// deterministic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field \"{field}\": {reason}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: String,
    /// Why its value was rejected.
    pub reason: Rejection,
}

impl ValidationError {
    /// Attach a field name to a rejection.
    pub fn new(field: impl Into<String>, reason: Rejection) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Inconsistencies detected while declaring fields, before any value is seen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// Field names must be non-empty.
    #[error("field name must not be empty")]
    EmptyName,

    /// The name collides with a key every entry carries.
    #[error("field name \"{0}\" is reserved")]
    ReservedName(String),

    /// Two fields of the same content type share a name.
    #[error("field \"{0}\" is declared more than once")]
    DuplicateField(String),

    /// Enumeration fields need at least one allowed value.
    #[error("enumeration field \"{0}\" declares no values")]
    MissingEnumValues(String),

    /// The allowed set of an enumeration contains the same value twice.
    #[error("enumeration field \"{field}\" lists \"{value}\" more than once")]
    DuplicateEnumValue {
        /// Field name.
        field: String,
        /// The repeated value.
        value: String,
    },

    /// Allowed values were given for a field that is not an enumeration.
    #[error("field \"{field}\" of type {field_type} cannot declare enumeration values")]
    UnexpectedEnumValues {
        /// Field name.
        field: String,
        /// Declared type.
        field_type: FieldType,
    },

    /// Length bounds were given for a non-textual field.
    #[error("field \"{field}\" of type {field_type} cannot declare length bounds")]
    UnexpectedLengthBounds {
        /// Field name.
        field: String,
        /// Declared type.
        field_type: FieldType,
    },

    /// `minLength` is greater than `maxLength`.
    #[error("field \"{field}\" has minLength {min} greater than maxLength {max}")]
    InvalidLengthBounds {
        /// Field name.
        field: String,
        /// Declared minimum.
        min: u64,
        /// Declared maximum.
        max: u64,
    },

    /// The declared default would itself be rejected by the field.
    #[error("default value of field \"{field}\" is invalid: {reason}")]
    InvalidDefault {
        /// Field name.
        field: String,
        /// Why the default was rejected.
        reason: Rejection,
    },
}
