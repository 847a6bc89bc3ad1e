//! Survey webserver library
//!
//! Serves a paired-annotation rating study: balanced item assignment across
//! participants, per-session response capture, and durable submission
//! storage, exposed over an HTTP JSON API.

pub mod core;
pub mod error;
pub mod server_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use server_impl::SurveyServer;
pub use state::ServerState;
pub use types::*;

// Re-export trait definitions
pub use traits::{ResultStore, StaticFileServer};

// Re-export service implementations
pub use services::{RealResultStore, RealStaticFileServer};
