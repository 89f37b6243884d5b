//! # Schema Errors
//!
//! Failures while declaring, loading, or registering content types. These
//! are configuration errors: they surface at startup or in the CLI, never in
//! response to an entry write.

use cmgr_core::{DeclarationError, FieldType};
use thiserror::Error;

use crate::descriptor::Violation;

/// Error building or loading a content type.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Content-type names are lowercase alphanumerics, `-` and `_`.
    #[error("invalid content type name \"{0}\" (expected lowercase letters, digits, '-' or '_')")]
    InvalidName(String),

    /// A content type needs at least one field.
    #[error("content type \"{0}\" declares no attributes")]
    NoFields(String),

    /// A field declaration of the content type is inconsistent.
    #[error("content type \"{content_type}\": {source}")]
    Declaration {
        /// Name of the content type being built.
        content_type: String,
        /// The underlying declaration problem.
        #[source]
        source: DeclarationError,
    },

    /// The validator registry has no entry for a declared field type.
    #[error("content type \"{content_type}\": no validator registered for field type {field_type}")]
    NoValidator {
        /// Name of the content type being built.
        content_type: String,
        /// The unsupported field type.
        field_type: FieldType,
    },

    /// Two content types resolve to the same uid.
    #[error("content type \"{0}\" is registered more than once")]
    DuplicateContentType(String),

    /// A descriptor file could not be read or parsed.
    #[error("descriptor load error for '{path}': {reason}")]
    DescriptorLoad {
        /// Path of the descriptor.
        path: String,
        /// Why it could not be loaded.
        reason: String,
    },

    /// A descriptor does not conform to the content-type JSON Schema.
    #[error("descriptor '{path}' is invalid:\n{}", format_violations(.violations))]
    InvalidDescriptor {
        /// Path of the descriptor, or `<inline>` for in-memory documents.
        path: String,
        /// Structural violations reported by the schema validator.
        violations: Vec<Violation>,
    },

    /// The embedded content-type JSON Schema could not be compiled.
    #[error("descriptor schema build error: {0}")]
    SchemaBuild(String),

    /// IO error reading descriptors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_descriptor_lists_every_violation() {
        let err = SchemaError::InvalidDescriptor {
            path: "withboolean.yaml".into(),
            violations: vec![
                Violation {
                    instance_path: "/attributes/field/type".into(),
                    message: "\"date\" is not one of the allowed values".into(),
                },
                Violation {
                    instance_path: String::new(),
                    message: "\"name\" is a required property".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("withboolean.yaml"));
        assert!(msg.contains("/attributes/field/type"));
        assert!(msg.contains("(root)"));
    }

    #[test]
    fn declaration_error_names_content_type() {
        let err = SchemaError::Declaration {
            content_type: "withstring".into(),
            source: DeclarationError::ReservedName("id".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("withstring"));
        assert!(msg.contains("\"id\" is reserved"));
    }
}
