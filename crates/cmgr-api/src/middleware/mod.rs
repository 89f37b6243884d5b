//! # HTTP Middleware
//!
//! - `metrics`: request/error counters through the `metrics` facade and
//!   the `/metrics` exposition route.
//! - `trace`: `tower_http` request spans.

pub mod metrics;
pub mod trace;
