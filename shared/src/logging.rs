//! Shared logging utilities for consistent tracing setup
//!
//! The survey server is a single process, so this is a thin layer over
//! `tracing_subscriber`: an env-filter built from the requested level plus a
//! few contextual helpers used at startup and shutdown.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Initialize the tracing subscriber with an optional base level.
///
/// Noise from the HTTP stack is capped at `warn` regardless of the requested
/// level. Calling this twice (e.g. from multiple tests) is tolerated.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base_level = log_level.unwrap_or("info");
    let env_filter = format!("webserver={base_level},shared={base_level},tower_http=warn,hyper=warn");

    let _ = fmt()
        .with_env_filter(EnvFilter::new(&env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Initialize tracing with the default level
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(reason: &str) {
    info!(timestamp = format_timestamp(), "🛑 Shutting down: {}", reason);
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for non-fatal problems
pub fn log_warning(context: &str, detail: &str) {
    warn!(timestamp = format_timestamp(), "⚠️ {}: {}", context, detail);
}

/// Contextual logging helper for success conditions
pub fn log_success(message: &str) {
    info!(timestamp = format_timestamp(), "✅ {}", message);
}

/// Contextual logging helper for progress updates
pub fn log_progress(action: &str, details: &str) {
    info!(timestamp = format_timestamp(), "📋 {}: {}", action, details);
}
