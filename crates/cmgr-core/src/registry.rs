//! # Validator Registry
//!
//! Maps a declared [`FieldType`] to its [`Validator`]. A registry is an
//! ordinary value: build it once (normally with
//! [`ValidatorRegistry::standard`]), compile content types against it, and
//! share it by reference. Nothing here is global or mutable after
//! construction.

use std::collections::BTreeMap;

use crate::error::{Rejection, ValidationError};
use crate::field::{FieldDeclaration, FieldType};
use crate::validate::{self, Coercion, Validator};
use crate::value::{InputValue, StoredValue};

/// Immutable mapping from field type to validator function.
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    validators: BTreeMap<FieldType, Validator>,
}

impl ValidatorRegistry {
    /// A registry with no validators. Useful only as a starting point for
    /// [`ValidatorRegistry::with`].
    pub fn empty() -> Self {
        Self {
            validators: BTreeMap::new(),
        }
    }

    /// The registry covering every [`FieldType`].
    pub fn standard() -> Self {
        Self::empty()
            .with(FieldType::Boolean, validate::validate_boolean)
            .with(FieldType::Enumeration, validate::validate_enumeration)
            .with(FieldType::String, validate::validate_textual)
            .with(FieldType::Text, validate::validate_textual)
            .with(FieldType::Richtext, validate::validate_textual)
    }

    /// Return a registry with `validator` bound to `field_type`, replacing
    /// any previous binding.
    pub fn with(mut self, field_type: FieldType, validator: Validator) -> Self {
        self.validators.insert(field_type, validator);
        self
    }

    /// Look up the validator for a field type.
    pub fn get(&self, field_type: FieldType) -> Option<Validator> {
        self.validators.get(&field_type).copied()
    }

    /// Whether every [`FieldType`] has a validator.
    pub fn is_complete(&self) -> bool {
        FieldType::ALL.iter().all(|t| self.validators.contains_key(t))
    }

    /// Field types with a bound validator, in [`FieldType`] order.
    pub fn field_types(&self) -> impl Iterator<Item = FieldType> + '_ {
        self.validators.keys().copied()
    }

    /// Run the validator for `decl` on `input` without attaching a field
    /// name. Returns `None` if the registry has no validator for the type.
    pub fn coerce(&self, decl: &FieldDeclaration, input: &InputValue) -> Option<Coercion> {
        self.get(decl.field_type()).map(|validator| validator(decl, input))
    }

    /// Validate one field value, naming the field on rejection.
    ///
    /// A field type without a registered validator rejects every non-null
    /// value as a type mismatch.
    pub fn validate(
        &self,
        decl: &FieldDeclaration,
        input: &InputValue,
    ) -> Result<StoredValue, ValidationError> {
        let outcome = match self.coerce(decl, input) {
            Some(outcome) => outcome,
            None if input.is_null() => Ok(StoredValue::Null),
            None => Err(Rejection::TypeMismatch {
                expected: decl.field_type(),
                found: input.kind(),
            }),
        };
        outcome.map_err(|reason| ValidationError::new(decl.name(), reason))
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_registry_is_complete() {
        let registry = ValidatorRegistry::standard();
        assert!(registry.is_complete());
        assert_eq!(registry.field_types().count(), FieldType::ALL.len());
    }

    #[test]
    fn textual_types_share_one_validator() {
        let registry = ValidatorRegistry::standard();
        let value = InputValue::from(json!("Some\ntext"));
        for field_type in [FieldType::String, FieldType::Text, FieldType::Richtext] {
            let decl = FieldDeclaration::new("field", field_type);
            assert_eq!(
                registry.coerce(&decl, &value),
                Some(Ok(StoredValue::from("Some\ntext")))
            );
        }
    }

    #[test]
    fn validate_attaches_field_name() {
        let registry = ValidatorRegistry::standard();
        let decl = FieldDeclaration::boolean("published");
        let err = registry
            .validate(&decl, &InputValue::from(json!("random")))
            .unwrap_err();
        assert_eq!(err.field, "published");
    }

    #[test]
    fn missing_validator_only_accepts_null() {
        let registry = ValidatorRegistry::empty();
        assert!(!registry.is_complete());
        let decl = FieldDeclaration::boolean("field");
        assert_eq!(
            registry.validate(&decl, &InputValue::Null),
            Ok(StoredValue::Null)
        );
        assert!(registry
            .validate(&decl, &InputValue::from(json!(true)))
            .is_err());
    }

    #[test]
    fn with_overrides_binding() {
        fn always_true(_: &FieldDeclaration, _: &InputValue) -> Coercion {
            Ok(StoredValue::Boolean(true))
        }
        let registry = ValidatorRegistry::standard().with(FieldType::Boolean, always_true);
        let decl = FieldDeclaration::boolean("field");
        assert_eq!(
            registry.validate(&decl, &InputValue::from(json!("random"))),
            Ok(StoredValue::Boolean(true))
        );
    }
}
