//! # Write Dispatch
//!
//! Applies a content type's validators to the raw payload of a create or
//! update request and merges the per-field outcomes into a single result.
//!
//! ## Rules
//!
//! - The payload must be a JSON object.
//! - Every declared field present in the payload is validated exactly once.
//! - Keys that are not declared fields are ignored.
//! - On create, absent fields take their default (or null); on update they
//!   are left out of the result so the stored value is kept.
//! - A required field may never end up null.
//! - If any field is rejected, the whole write is rejected. All rejections
//!   of the payload are reported together; nothing is returned for storage.

use std::collections::BTreeMap;

use cmgr_core::{InputValue, Rejection, StoredValue, ValidationError, ValueKind};
use serde_json::Value;
use thiserror::Error;

use crate::content_type::ContentType;

/// Accepted values of one write, keyed by field name.
pub type FieldValues = BTreeMap<String, StoredValue>;

/// Whether the payload creates a new entry or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// A write payload that cannot be stored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    /// The payload is not a JSON object.
    #[error("payload must be a JSON object, found {0}")]
    NotAnObject(ValueKind),

    /// One or more fields were rejected.
    #[error("{} field(s) rejected: {}", .0.len(), summarize(.0))]
    Rejected(Vec<ValidationError>),
}

impl PayloadError {
    /// The field rejections, empty for a malformed payload.
    pub fn rejections(&self) -> &[ValidationError] {
        match self {
            Self::Rejected(errors) => errors,
            Self::NotAnObject(_) => &[],
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a write payload against `content_type`.
///
/// Returns the values to persist: on create, one per declared field; on
/// update, only those present in the payload.
///
/// # Errors
///
/// [`PayloadError::NotAnObject`] if `payload` is not an object;
/// [`PayloadError::Rejected`] with every field rejection otherwise.
pub fn validate_write(
    content_type: &ContentType,
    payload: &Value,
    mode: WriteMode,
) -> Result<FieldValues, PayloadError> {
    let object = match payload {
        Value::Object(object) => object,
        other => return Err(PayloadError::NotAnObject(InputValue::from(other).kind())),
    };

    for key in object.keys() {
        if content_type.field(key).is_none() {
            tracing::debug!(
                content_type = content_type.uid(),
                key = key.as_str(),
                "ignoring undeclared payload key"
            );
        }
    }

    let mut accepted = FieldValues::new();
    let mut rejected = Vec::new();

    for field in content_type.fields() {
        let decl = field.declaration();
        let value = match object.get(decl.name()) {
            Some(raw) => match field.validate(&InputValue::from(raw)) {
                Ok(value) => value,
                Err(err) => {
                    rejected.push(err);
                    continue;
                }
            },
            None => match mode {
                WriteMode::Create => field.default_value().cloned().unwrap_or(StoredValue::Null),
                WriteMode::Update => continue,
            },
        };

        if decl.is_required() && value.is_null() {
            rejected.push(ValidationError::new(decl.name(), Rejection::Required));
            continue;
        }
        accepted.insert(decl.name().to_string(), value);
    }

    if rejected.is_empty() {
        Ok(accepted)
    } else {
        tracing::debug!(
            content_type = content_type.uid(),
            rejected = rejected.len(),
            "write payload rejected"
        );
        Err(PayloadError::Rejected(rejected))
    }
}
