//! # Field Declarations
//!
//! A [`FieldDeclaration`] names one typed attribute of a content type and
//! carries the options its validator consults: the allowed set of an
//! enumeration, presence requirement, default, and length bounds for the
//! textual types.
//!
//! Declarations are assembled with the `with_*` methods and checked once
//! with [`FieldDeclaration::check`] when their content type is built. After
//! that they are never mutated.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CmgrError, DeclarationError};

/// Keys present on every stored entry. Fields may not shadow them.
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["id", "created_at", "updated_at"];

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// The scalar field types the content manager knows how to coerce.
///
/// Deserialization goes through [`FromStr`], so an unknown name fails with
/// [`CmgrError::UnknownFieldType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FieldType {
    Boolean,
    Enumeration,
    String,
    Text,
    Richtext,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 5] = [
        FieldType::Boolean,
        FieldType::Enumeration,
        FieldType::String,
        FieldType::Text,
        FieldType::Richtext,
    ];

    /// The name used in content-type descriptors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Enumeration => "enumeration",
            Self::String => "string",
            Self::Text => "text",
            Self::Richtext => "richtext",
        }
    }

    /// Whether values of this type are free-form strings.
    ///
    /// `string`, `text` and `richtext` share one validator; they differ only
    /// in declared intent.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Text | Self::Richtext)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CmgrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CmgrError::UnknownFieldType(s.to_string()))
    }
}

impl TryFrom<String> for FieldType {
    type Error = CmgrError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// FieldDeclaration
// ---------------------------------------------------------------------------

/// One named, typed attribute of a content type.
///
/// Serializes in descriptor form (`type`, `enum`, `minLength`, ...) so the
/// content-type listing endpoint can echo declarations back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDeclaration {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    allowed: Vec<String>,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
}

impl FieldDeclaration {
    /// Declare an optional field of the given type with no extra options.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            allowed: Vec::new(),
            required: false,
            default: None,
            min_length: None,
            max_length: None,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Declare an enumeration restricted to `values`.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldType::Enumeration).with_enum_values(values)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn richtext(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Richtext)
    }

    /// Replace the allowed set. Order is preserved for error messages.
    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the raw default applied on create when the field is absent.
    ///
    /// The default is validated against the field when the content type is
    /// compiled, not here.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Allowed values of an enumeration; empty for every other type.
    pub fn allowed_values(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn min_length(&self) -> Option<u64> {
        self.min_length
    }

    pub fn max_length(&self) -> Option<u64> {
        self.max_length
    }

    /// Check that the declaration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeclarationError`] found: empty or reserved name,
    /// enumeration without values or with duplicates, enumeration values on a
    /// non-enumeration, length bounds on a non-textual type, or inverted
    /// bounds.
    pub fn check(&self) -> Result<(), DeclarationError> {
        if self.name.trim().is_empty() {
            return Err(DeclarationError::EmptyName);
        }
        if RESERVED_FIELD_NAMES.contains(&self.name.as_str()) {
            return Err(DeclarationError::ReservedName(self.name.clone()));
        }

        match self.field_type {
            FieldType::Enumeration => {
                if self.allowed.is_empty() {
                    return Err(DeclarationError::MissingEnumValues(self.name.clone()));
                }
                let mut seen = HashSet::new();
                for value in &self.allowed {
                    if !seen.insert(value.as_str()) {
                        return Err(DeclarationError::DuplicateEnumValue {
                            field: self.name.clone(),
                            value: value.clone(),
                        });
                    }
                }
            }
            other if !self.allowed.is_empty() => {
                return Err(DeclarationError::UnexpectedEnumValues {
                    field: self.name.clone(),
                    field_type: other,
                });
            }
            _ => {}
        }

        let has_bounds = self.min_length.is_some() || self.max_length.is_some();
        if has_bounds && !self.field_type.is_textual() {
            return Err(DeclarationError::UnexpectedLengthBounds {
                field: self.name.clone(),
                field_type: self.field_type,
            });
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(DeclarationError::InvalidLengthBounds {
                    field: self.name.clone(),
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}
