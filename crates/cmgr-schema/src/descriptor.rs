//! # Content-Type Descriptors
//!
//! Loading of content-type definitions from YAML or JSON documents.
//!
//! ## Trust Boundary
//!
//! Descriptors are validated against the embedded
//! `schemas/content-type.schema.json` (Draft 2020-12) before they are
//! deserialized. A descriptor that fails validation is rejected with every
//! violation and its JSON pointer, rather than the first serde error.
//!
//! ## Formats
//!
//! Files ending in `.json` are parsed as JSON; `.yaml` and `.yml` as YAML.
//! Anything else in a descriptor directory is ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use cmgr_core::{FieldDeclaration, FieldType, ValidatorRegistry};
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content_type::{ContentType, ContentTypeBuilder};
use crate::error::SchemaError;

/// The content-type descriptor schema, compiled into the binary.
const CONTENT_TYPE_SCHEMA: &str = include_str!("../schemas/content-type.schema.json");

/// Pseudo-path used for descriptors that did not come from a file.
const INLINE_ORIGIN: &str = "<inline>";

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// A content type as written in a descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentTypeDescriptor {
    /// Content-type name; the uid is derived from it.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field name to attribute options, iterated in name order.
    pub attributes: BTreeMap<String, AttributeDescriptor>,
}

/// One attribute of a [`ContentTypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDescriptor {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl AttributeDescriptor {
    /// Convert to a field declaration named `name`.
    pub fn to_declaration(&self, name: &str) -> FieldDeclaration {
        let mut decl = FieldDeclaration::new(name, self.field_type)
            .with_enum_values(self.values.iter().cloned())
            .with_required(self.required);
        if let Some(default) = &self.default {
            decl = decl.with_default(default.clone());
        }
        if let Some(min) = self.min_length {
            decl = decl.with_min_length(min);
        }
        if let Some(max) = self.max_length {
            decl = decl.with_max_length(max);
        }
        decl
    }
}

impl ContentTypeDescriptor {
    /// A builder holding every attribute of the descriptor.
    pub fn into_builder(self) -> ContentTypeBuilder {
        self.attributes
            .iter()
            .fold(ContentTypeBuilder::new(self.name.clone()), |builder, (name, attr)| {
                builder.field(attr.to_declaration(name))
            })
    }

    /// Compile the descriptor against `registry`.
    pub fn build(self, registry: &ValidatorRegistry) -> Result<ContentType, SchemaError> {
        self.into_builder().build(registry)
    }
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// A single structural violation in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value; empty for the document root.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

// ---------------------------------------------------------------------------
// DescriptorValidator
// ---------------------------------------------------------------------------

/// Result of loading every descriptor in a directory.
#[derive(Debug, Default)]
pub struct DescriptorReport {
    /// Content types that compiled successfully, in file-name order.
    pub loaded: Vec<ContentType>,
    /// Descriptors that failed, with the reason.
    pub failures: Vec<(PathBuf, SchemaError)>,
}

impl DescriptorReport {
    pub fn total(&self) -> usize {
        self.loaded.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses descriptors and checks them against the content-type schema.
///
/// The schema is compiled once at construction; the validator is
/// `Send + Sync` and can be reused for any number of documents.
pub struct DescriptorValidator {
    schema: Validator,
}

impl fmt::Debug for DescriptorValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorValidator").finish_non_exhaustive()
    }
}

impl DescriptorValidator {
    /// Compile the embedded content-type schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaBuild`] if the embedded schema is not a
    /// valid Draft 2020-12 schema.
    pub fn new() -> Result<Self, SchemaError> {
        let schema: Value = serde_json::from_str(CONTENT_TYPE_SCHEMA)
            .map_err(|e| SchemaError::SchemaBuild(format!("invalid JSON: {e}")))?;

        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let schema = opts
            .build(&schema)
            .map_err(|e| SchemaError::SchemaBuild(e.to_string()))?;

        Ok(Self { schema })
    }

    /// Every structural violation of `document`; empty when it conforms.
    pub fn check(&self, document: &Value) -> Vec<Violation> {
        self.schema
            .iter_errors(document)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }

    /// Validate an already-parsed document and deserialize it.
    pub fn parse_value(
        &self,
        document: Value,
        origin: &str,
    ) -> Result<ContentTypeDescriptor, SchemaError> {
        let violations = self.check(&document);
        if !violations.is_empty() {
            return Err(SchemaError::InvalidDescriptor {
                path: origin.to_string(),
                violations,
            });
        }
        serde_json::from_value(document).map_err(|e| SchemaError::DescriptorLoad {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a JSON descriptor held in memory.
    pub fn parse_json(&self, source: &str) -> Result<ContentTypeDescriptor, SchemaError> {
        let document = serde_json::from_str(source).map_err(|e| SchemaError::DescriptorLoad {
            path: INLINE_ORIGIN.to_string(),
            reason: format!("invalid JSON: {e}"),
        })?;
        self.parse_value(document, INLINE_ORIGIN)
    }

    /// Parse a YAML descriptor held in memory.
    pub fn parse_yaml(&self, source: &str) -> Result<ContentTypeDescriptor, SchemaError> {
        let document = serde_yaml::from_str(source).map_err(|e| SchemaError::DescriptorLoad {
            path: INLINE_ORIGIN.to_string(),
            reason: format!("invalid YAML: {e}"),
        })?;
        self.parse_value(document, INLINE_ORIGIN)
    }

    /// Read, parse and validate one descriptor file.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DescriptorLoad`] if the file cannot be read, has an
    /// unsupported extension, or is not valid JSON/YAML;
    /// [`SchemaError::InvalidDescriptor`] if it violates the schema.
    pub fn load_file(&self, path: &Path) -> Result<ContentTypeDescriptor, SchemaError> {
        let origin = path.display().to_string();
        let load_error = |reason: String| SchemaError::DescriptorLoad {
            path: origin.clone(),
            reason,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| load_error(format!("cannot read file: {e}")))?;

        let document: Value = match extension(path) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| load_error(format!("invalid JSON: {e}")))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| load_error(format!("invalid YAML: {e}")))?,
            _ => return Err(load_error("unsupported extension (expected .json, .yaml or .yml)".into())),
        };

        self.parse_value(document, &origin)
    }

    /// Load one descriptor file and compile it.
    pub fn load_content_type(
        &self,
        path: &Path,
        registry: &ValidatorRegistry,
    ) -> Result<ContentType, SchemaError> {
        self.load_file(path)?.build(registry)
    }

    /// Load every descriptor file directly inside `dir`.
    ///
    /// Individual failures are collected in the report instead of aborting
    /// the scan.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] only if the directory itself cannot be
    /// listed.
    pub fn load_dir(
        &self,
        dir: &Path,
        registry: &ValidatorRegistry,
    ) -> Result<DescriptorReport, SchemaError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_descriptor_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = DescriptorReport::default();
        for path in paths {
            match self.load_content_type(&path, registry) {
                Ok(content_type) => report.loaded.push(content_type),
                Err(err) => report.failures.push((path, err)),
            }
        }
        Ok(report)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Whether `path` has a descriptor extension.
pub fn is_descriptor_file(path: &Path) -> bool {
    matches!(extension(path), Some("json" | "yaml" | "yml"))
}
