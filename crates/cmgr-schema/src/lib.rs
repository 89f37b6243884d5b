//! # cmgr-schema: Content Types & Write Dispatch
//!
//! Turns content-type definitions into compiled, immutable [`ContentType`]
//! values and applies them to write payloads.
//!
//! ## Content Types (`content_type`)
//!
//! [`ContentTypeBuilder`] collects field declarations, checks them, and binds
//! each field to its validator from a [`cmgr_core::ValidatorRegistry`]. The
//! result is shared by `Arc` through the [`ContentTypeRegistry`].
//!
//! ## Descriptors (`descriptor`)
//!
//! Content types are usually declared in YAML or JSON files:
//!
//! ```yaml
//! name: withenumeration
//! attributes:
//!   field:
//!     type: enumeration
//!     enum: [one, two]
//! ```
//!
//! Descriptor files are checked against an embedded JSON Schema before being
//! built, so structural mistakes are reported with their JSON pointer.
//!
//! ## Dispatch (`payload`)
//!
//! [`validate_write`] runs every declared field of a create or update
//! payload through its validator once and merges the outcomes: either all
//! values are accepted together or the write is rejected as a whole.

pub mod content_type;
pub mod descriptor;
pub mod error;
pub mod payload;
pub mod registry;

pub use content_type::{content_type_uid, CompiledField, ContentType, ContentTypeBuilder};
pub use descriptor::{
    AttributeDescriptor, ContentTypeDescriptor, DescriptorReport, DescriptorValidator,
    Violation,
};
pub use error::SchemaError;
pub use payload::{validate_write, FieldValues, PayloadError, WriteMode};
pub use registry::ContentTypeRegistry;
