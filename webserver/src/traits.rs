//! Service trait definitions for dependency injection
//!
//! All I/O operations are abstracted through these traits for testability

use async_trait::async_trait;
use axum::response::Response;
use std::collections::HashSet;

use crate::error::WebServerResult;
use shared::CompletedSession;

/// Durable persistence of completed-session records.
///
/// The store is also the source of truth for which participant names have
/// already been used, across process restarts.
#[mockall::automock]
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Durably write one completed-session record; returns the stored
    /// record's filename. Never silently swallows I/O failures.
    async fn persist(&self, record: &CompletedSession) -> WebServerResult<String>;

    /// Scan all stored records for participant names. Individually corrupt
    /// records are skipped with a warning, never fatal.
    async fn load_used_names(&self) -> WebServerResult<HashSet<String>>;
}

/// Static file serving for the survey frontend and the item media assets.
#[mockall::automock]
#[async_trait]
pub trait StaticFileServer: Send + Sync {
    /// Serve a frontend asset (root maps to the index page)
    async fn serve_asset(&self, path: &str) -> WebServerResult<Response>;

    /// Serve a file from the dataset/media mount
    async fn serve_data(&self, path: &str) -> WebServerResult<Response>;
}
