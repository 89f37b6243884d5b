//! # API Route Modules
//!
//! - `explorer`: create, update, read and delete entries of a content
//!   type. Writes run through the field coercion contract of `cmgr-schema`.
//! - `content_types`: read-only listing of the registered content types.

pub mod content_types;
pub mod explorer;
