//! # cmgr-cli: CLI Tool for the Content Manager
//!
//! Provides the `cmgr` command-line interface.
//!
//! ## Subcommands
//!
//! - `cmgr validate`: check content-type descriptor files against the
//!   descriptor schema and the field declaration rules.
//! - `cmgr coerce`: run a write payload through a content type's field
//!   validators without a server, printing the values that would be stored
//!   or every rejected field.
//!
//! ```bash
//! cmgr validate content-types/
//! cmgr coerce --content-type content-types/withboolean.yaml --data '{"field": 1}'
//! ```

pub mod coerce;
pub mod validate;
