//! # Content Types
//!
//! A [`ContentType`] is a named set of field declarations compiled against
//! a [`ValidatorRegistry`]: every field carries the validator it will use
//! and its coerced default. Compilation happens once, in
//! [`ContentTypeBuilder::build`]; afterwards the content type is immutable.

use std::collections::HashSet;

use cmgr_core::{
    DeclarationError, FieldDeclaration, InputValue, StoredValue, ValidationError, Validator,
    ValidatorRegistry,
};

use crate::error::SchemaError;

/// Namespace prefix of every content-type uid.
const UID_NAMESPACE: &str = "application";

/// The uid under which a content type named `name` is addressed.
///
/// ```
/// assert_eq!(
///     cmgr_schema::content_type_uid("withboolean"),
///     "application::withboolean.withboolean"
/// );
/// ```
pub fn content_type_uid(name: &str) -> String {
    format!("{UID_NAMESPACE}::{name}.{name}")
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

// ---------------------------------------------------------------------------
// CompiledField
// ---------------------------------------------------------------------------

/// A field declaration bound to its validator.
#[derive(Debug, Clone)]
pub struct CompiledField {
    declaration: FieldDeclaration,
    validator: Validator,
    default: Option<StoredValue>,
}

impl CompiledField {
    pub fn declaration(&self) -> &FieldDeclaration {
        &self.declaration
    }

    pub fn name(&self) -> &str {
        self.declaration.name()
    }

    /// The declared default, already coerced.
    pub fn default_value(&self) -> Option<&StoredValue> {
        self.default.as_ref()
    }

    /// Run the bound validator on one input value.
    pub fn validate(&self, input: &InputValue) -> Result<StoredValue, ValidationError> {
        (self.validator)(&self.declaration, input)
            .map_err(|reason| ValidationError::new(self.declaration.name(), reason))
    }
}

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// A compiled, immutable content type.
#[derive(Debug, Clone)]
pub struct ContentType {
    uid: String,
    name: String,
    fields: Vec<CompiledField>,
}

impl ContentType {
    /// Start declaring a content type.
    pub fn builder(name: impl Into<String>) -> ContentTypeBuilder {
        ContentTypeBuilder::new(name)
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled fields in the order they were added to the builder.
    ///
    /// Descriptor attributes are keyed by name, so a content type loaded
    /// from a descriptor lists its fields alphabetically.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// The raw declarations, in the same order as [`ContentType::fields`].
    pub fn declarations(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.fields.iter().map(CompiledField::declaration)
    }
}

// ---------------------------------------------------------------------------
// ContentTypeBuilder
// ---------------------------------------------------------------------------

/// Collects field declarations and compiles them into a [`ContentType`].
#[derive(Debug, Clone)]
pub struct ContentTypeBuilder {
    name: String,
    fields: Vec<FieldDeclaration>,
}

impl ContentTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field. Declarations are checked in [`build`](Self::build).
    pub fn field(mut self, declaration: FieldDeclaration) -> Self {
        self.fields.push(declaration);
        self
    }

    /// Check every declaration and bind it to its validator.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidName`] for a malformed content-type name.
    /// - [`SchemaError::NoFields`] if no field was declared.
    /// - [`SchemaError::Declaration`] for an inconsistent or duplicate field,
    ///   or a default that its own validator rejects.
    /// - [`SchemaError::NoValidator`] if `registry` lacks a field type.
    pub fn build(self, registry: &ValidatorRegistry) -> Result<ContentType, SchemaError> {
        if !is_valid_name(&self.name) {
            return Err(SchemaError::InvalidName(self.name));
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(self.name));
        }

        let declaration_error = |source: DeclarationError| SchemaError::Declaration {
            content_type: self.name.clone(),
            source,
        };

        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(self.fields.len());
        for declaration in &self.fields {
            declaration.check().map_err(declaration_error)?;
            if !seen.insert(declaration.name()) {
                return Err(declaration_error(DeclarationError::DuplicateField(
                    declaration.name().to_string(),
                )));
            }

            let validator =
                registry
                    .get(declaration.field_type())
                    .ok_or_else(|| SchemaError::NoValidator {
                        content_type: self.name.clone(),
                        field_type: declaration.field_type(),
                    })?;

            let default = match declaration.default_value() {
                Some(raw) => Some(validator(declaration, &InputValue::from(raw)).map_err(
                    |reason| {
                        declaration_error(DeclarationError::InvalidDefault {
                            field: declaration.name().to_string(),
                            reason,
                        })
                    },
                )?),
                None => None,
            };

            compiled.push(CompiledField {
                declaration: declaration.clone(),
                validator,
                default,
            });
        }

        Ok(ContentType {
            uid: content_type_uid(&self.name),
            name: self.name,
            fields: compiled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmgr_core::{FieldType, Rejection};
    use serde_json::json;

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::standard()
    }

    #[test]
    fn uid_follows_application_namespace() {
        let ct = ContentType::builder("withboolean")
            .field(FieldDeclaration::boolean("field"))
            .build(&registry())
            .unwrap();
        assert_eq!(ct.uid(), "application::withboolean.withboolean");
        assert_eq!(ct.name(), "withboolean");
        assert_eq!(ct.fields().len(), 1);
        assert_eq!(ct.field("field").unwrap().declaration().field_type(), FieldType::Boolean);
    }

    #[test]
    fn malformed_names_rejected() {
        for name in ["", "With Space", "Upper", "-lead", "a.b"] {
            let err = ContentType::builder(name)
                .field(FieldDeclaration::boolean("field"))
                .build(&registry())
                .unwrap_err();
            assert!(matches!(err, SchemaError::InvalidName(_)), "{name}: {err}");
        }
    }

    #[test]
    fn content_type_needs_fields() {
        let err = ContentType::builder("empty").build(&registry()).unwrap_err();
        assert!(matches!(err, SchemaError::NoFields(_)));
    }

    #[test]
    fn duplicate_field_rejected() {
        let err = ContentType::builder("dup")
            .field(FieldDeclaration::string("field"))
            .field(FieldDeclaration::text("field"))
            .build(&registry())
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Declaration {
                source: DeclarationError::DuplicateField(_),
                ..
            }
        ));
    }

    #[test]
    fn default_is_coerced_at_build_time() {
        let ct = ContentType::builder("withdefault")
            .field(FieldDeclaration::boolean("flag").with_default(json!(1)))
            .build(&registry())
            .unwrap();
        assert_eq!(
            ct.field("flag").unwrap().default_value(),
            Some(&StoredValue::Boolean(true))
        );
    }

    #[test]
    fn invalid_default_rejected() {
        let err = ContentType::builder("withdefault")
            .field(FieldDeclaration::enumeration("field", ["one", "two"]).with_default(json!("three")))
            .build(&registry())
            .unwrap_err();
        match err {
            SchemaError::Declaration {
                source: DeclarationError::InvalidDefault { field, reason },
                ..
            } => {
                assert_eq!(field, "field");
                assert!(matches!(reason, Rejection::NotInEnumeration { .. }));
            }
            other => panic!("expected InvalidDefault, got: {other:?}"),
        }
    }

    #[test]
    fn missing_validator_rejected() {
        let partial = ValidatorRegistry::empty()
            .with(FieldType::Boolean, cmgr_core::validate::validate_boolean);
        let err = ContentType::builder("withstring")
            .field(FieldDeclaration::string("field"))
            .build(&partial)
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::NoValidator {
                field_type: FieldType::String,
                ..
            }
        ));
    }

    #[test]
    fn compiled_field_uses_bound_validator() {
        let ct = ContentType::builder("withenumeration")
            .field(FieldDeclaration::enumeration("field", ["one", "two"]))
            .build(&registry())
            .unwrap();
        let field = ct.field("field").unwrap();
        assert_eq!(
            field.validate(&InputValue::from(json!("two"))),
            Ok(StoredValue::from("two"))
        );
        let err = field.validate(&InputValue::from(json!("invalid-value"))).unwrap_err();
        assert_eq!(err.field, "field");
    }
}
