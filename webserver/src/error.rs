//! WebServer-specific error types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("Participant name cannot be empty")]
    EmptyParticipantName,

    #[error("This name has already been used. Please use a different name.")]
    DuplicateName { name: String },

    #[error("This name is currently in use. Please try again later or use a different name.")]
    NameInUse { name: String },

    #[error("Session not found")]
    SessionNotFound { session_id: String },

    #[error("Item index {index} is outside the assigned sample of {total} items")]
    ItemIndexOutOfRange { index: usize, total: usize },

    #[error("Failed to load item data: {message}")]
    DataLoad { message: String },

    #[error("Failed to persist session results: {message}")]
    Persistence { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("HTTP server startup failed: {0}")]
    ServerStartup(String),

    #[error("Response building error: {0}")]
    ResponseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl WebServerError {
    /// Create a data-load error
    pub fn data_load(message: impl Into<String>) -> Self {
        Self::DataLoad { message: message.into() }
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence { message: message.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyParticipantName | Self::ItemIndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
            Self::DuplicateName { .. } | Self::NameInUse { .. } => StatusCode::CONFLICT,
            Self::SessionNotFound { .. } | Self::FileNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for errors the client distinguishes
    pub fn client_code(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateName { .. } => Some("DUPLICATE_NAME"),
            Self::NameInUse { .. } => Some("NAME_IN_USE"),
            _ => None,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        }

        let body = match self.client_code() {
            Some(code) => json!({ "error": self.to_string(), "code": code }),
            None => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;
