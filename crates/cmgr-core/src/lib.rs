//! # cmgr-core: Field Coercion & Validation Contract
//!
//! This crate is the bedrock of the content manager. It owns the rule table
//! that decides, for every scalar field type, whether a loosely-typed input
//! value is accepted (and in which canonical form it is stored) or rejected.
//! Every other crate in the workspace depends on `cmgr-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged input, tagged output.** Request payloads arrive as
//!    [`InputValue`] (a closed set of JSON kinds) and leave as
//!    [`StoredValue`]. There is no implicit coercion between the two outside
//!    the validators in [`validate`].
//!
//! 2. **One validator per field type.** `boolean`, `enumeration` and the
//!    textual trio (`string`, `text`, `richtext`) each map to a plain
//!    function. Validators are pure and deterministic.
//!
//! 3. **Explicit registry.** The [`ValidatorRegistry`] mapping field types to
//!    validators is an ordinary value built at content-type build time and
//!    passed by reference. There is no global mutable table.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cmgr-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod registry;
pub mod validate;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{CmgrError, DeclarationError, Rejection, ValidationError};
pub use field::{FieldDeclaration, FieldType, RESERVED_FIELD_NAMES};
pub use registry::ValidatorRegistry;
pub use validate::{Coercion, Validator};
pub use value::{InputValue, StoredValue, ValueKind};
