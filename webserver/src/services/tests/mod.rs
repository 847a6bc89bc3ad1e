//! Service tests for the webserver
//!
//! Covers the real result store and static file server implementations.
