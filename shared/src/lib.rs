//! Shared types for the paired-annotation survey system
//!
//! Contains the survey data model exchanged between the server, the durable
//! result records, and the frontend, plus the common logging setup.
//! Server-internal types (HTTP request/response wrappers) are kept in the
//! webserver crate.

pub mod logging;
pub mod types;

pub use types::*;
