//! Static file serving service
//!
//! Serves the survey frontend and the dataset/media directory with proper
//! content types and directory-traversal protection.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{WebServerError, WebServerResult};
use crate::traits::StaticFileServer;

/// Real static file server backed by two directory mounts: the frontend
/// assets and the dataset (post images and the raw item file).
#[derive(Clone)]
pub struct RealStaticFileServer {
    frontend_dir: PathBuf,
    data_dir: PathBuf,
    mime_types: HashMap<&'static str, &'static str>,
}

impl RealStaticFileServer {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(frontend_dir: P, data_dir: Q) -> Self {
        let mut mime_types = HashMap::new();
        mime_types.insert("html", "text/html; charset=utf-8");
        mime_types.insert("css", "text/css");
        mime_types.insert("js", "application/javascript");
        mime_types.insert("json", "application/json");
        mime_types.insert("png", "image/png");
        mime_types.insert("jpg", "image/jpeg");
        mime_types.insert("jpeg", "image/jpeg");
        mime_types.insert("gif", "image/gif");
        mime_types.insert("svg", "image/svg+xml");
        mime_types.insert("ico", "image/x-icon");
        mime_types.insert("woff", "font/woff");
        mime_types.insert("woff2", "font/woff2");

        Self {
            frontend_dir: frontend_dir.as_ref().to_path_buf(),
            data_dir: data_dir.as_ref().to_path_buf(),
            mime_types,
        }
    }

    /// Get MIME type from file extension
    fn get_mime_type(&self, path: &str) -> &'static str {
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.mime_types.get(ext.to_lowercase().as_str()).copied())
            .unwrap_or("application/octet-stream")
    }

    /// Get cache control header based on file type
    fn get_cache_control(&self, path: &str) -> Option<&'static str> {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("html") => Some("no-cache"),
            Some("js") | Some("css") => Some("public, max-age=3600"),
            Some("png") | Some("jpg") | Some("jpeg") | Some("gif") | Some("svg") | Some("ico") => {
                Some("public, max-age=86400")
            }
            Some("woff") | Some("woff2") => Some("public, max-age=604800"),
            _ => None,
        }
    }

    /// Resolve a request path inside `base_dir` and prevent directory
    /// traversal via canonicalized-prefix checking.
    fn resolve_path(&self, base_dir: &Path, request_path: &str) -> WebServerResult<PathBuf> {
        let clean_path = request_path.trim_start_matches('/');
        let file_path = if clean_path.is_empty() { "index.html" } else { clean_path };

        let full_path = base_dir.join(file_path);

        let canonical_path = full_path.canonicalize().map_err(|_| WebServerError::FileNotFound {
            path: request_path.to_string(),
        })?;

        let canonical_base = base_dir.canonicalize().map_err(|e| {
            shared::logging::log_error("Canonicalizing static base directory", &e);
            WebServerError::internal("static file base directory not accessible")
        })?;

        if !canonical_path.starts_with(&canonical_base) {
            return Err(WebServerError::FileNotFound {
                path: request_path.to_string(),
            });
        }

        Ok(canonical_path)
    }

    async fn serve_from(&self, base_dir: &Path, request_path: &str) -> WebServerResult<Response> {
        let mut file_path = self.resolve_path(base_dir, request_path)?;

        // Directory hits fall through to their index page
        if file_path.is_dir() {
            file_path = file_path.join("index.html");
            if !file_path.is_file() {
                return Err(WebServerError::FileNotFound {
                    path: request_path.to_string(),
                });
            }
        }

        let content = fs::read(&file_path).await.map_err(|_| WebServerError::FileNotFound {
            path: request_path.to_string(),
        })?;

        let resolved = file_path.to_string_lossy();
        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, self.get_mime_type(&resolved));
        if let Some(cache) = self.get_cache_control(&resolved) {
            builder = builder.header(header::CACHE_CONTROL, cache);
        }

        builder
            .body(Body::from(content))
            .map_err(|e| WebServerError::ResponseError(e.to_string()))
    }
}

#[async_trait]
impl StaticFileServer for RealStaticFileServer {
    async fn serve_asset(&self, path: &str) -> WebServerResult<Response> {
        self.serve_from(&self.frontend_dir, path).await
    }

    async fn serve_data(&self, path: &str) -> WebServerResult<Response> {
        self.serve_from(&self.data_dir, path).await
    }
}
