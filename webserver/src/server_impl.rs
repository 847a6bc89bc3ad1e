//! Main survey server implementation
//!
//! Contains the SurveyServer struct that wires the session registry to the
//! injected services, builds the Axum router, and owns the request handlers.

use std::sync::Arc;
use axum::{
    Router,
    extract::{Path, State},
    http::Uri,
    response::{Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::core::StudyRegistry;
use crate::error::{WebServerError, WebServerResult};
use crate::state::ServerState;
use crate::traits::{ResultStore, StaticFileServer};
use crate::types::{
    AckResponse, SaveResponseRequest, SessionDataResponse, StartSessionRequest,
    StartSessionResponse, SubmitRequest, SubmitResponse,
};

/// Survey server with dependency-injected persistence and static serving.
///
/// The registry sits behind one mutex; every survey operation takes the lock
/// once, which is what makes the allocator's select-then-increment sequence
/// atomic across concurrent session creations.
pub struct SurveyServer<R, F>
where
    R: ResultStore,
    F: StaticFileServer,
{
    state: Arc<ServerState>,
    registry: Arc<Mutex<StudyRegistry>>,
    result_store: Arc<R>,
    static_files: Arc<F>,
}

// Manual impl: the derive would demand Clone on the injected services
impl<R, F> Clone for SurveyServer<R, F>
where
    R: ResultStore,
    F: StaticFileServer,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            registry: Arc::clone(&self.registry),
            result_store: Arc::clone(&self.result_store),
            static_files: Arc::clone(&self.static_files),
        }
    }
}

impl<R, F> SurveyServer<R, F>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    /// Create a new survey server with injected dependencies
    pub fn new(state: ServerState, registry: StudyRegistry, result_store: R, static_files: F) -> Self {
        Self {
            state: Arc::new(state),
            registry: Arc::new(Mutex::new(registry)),
            result_store: Arc::new(result_store),
            static_files: Arc::new(static_files),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            // Frontend entry page
            .route("/", get(serve_index))
            // Dataset and media assets
            .route("/data/*path", get(serve_data_file))
            // API routes
            .route("/api/start-session", post(start_session_handler))
            .route("/api/session/:session_id/data", get(session_data_handler))
            .route("/api/session/:session_id/response", post(save_response_handler))
            .route("/api/session/:session_id/submit", post(submit_handler))
            .route("/api/stats", get(stats_handler))
            // Health check
            .route("/api/health", get(health_check))
            // Remaining paths are frontend assets
            .fallback(get(serve_frontend_file))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()).into_inner())
            .with_state(self.clone())
    }

    /// Start the webserver and serve until Ctrl-C
    pub async fn run(&self) -> WebServerResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.state.bind_address)
            .await
            .map_err(|e| {
                WebServerError::ServerStartup(format!(
                    "Failed to bind to {}: {e}",
                    self.state.bind_address
                ))
            })?;

        tracing::info!("🌐 Survey server listening on http://{}", self.state.bind_address);

        let server_task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                shared::logging::log_error("HTTP server", &e);
            }
        });

        tokio::select! {
            _ = server_task => {
                tracing::info!("HTTP server task completed");
            }
            _ = tokio::signal::ctrl_c() => {
                shared::logging::log_shutdown("Received Ctrl-C signal");
                self.state.set_running(false);
            }
        }

        Ok(())
    }

    /// Get server state for external access
    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Evict a submitted session after the grace delay.
    ///
    /// Fire-and-forget: nothing observes the task, and losing it on process
    /// exit is fine because durability lives in the result store.
    fn schedule_cleanup(&self, session_id: String) {
        let registry = Arc::clone(&self.registry);
        let grace = self.state.cleanup_grace;

        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if registry.lock().await.remove_session(&session_id) {
                tracing::info!("🧹 Session {session_id} cleared from memory");
            }
        });
    }
}

// HTTP Handlers

/// Create a new participant session with a balanced item sample
async fn start_session_handler<R, F>(
    State(server): State<SurveyServer<R, F>>,
    Json(request): Json<StartSessionRequest>,
) -> WebServerResult<Json<StartSessionResponse>>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    let participant_name = request.participant_name.trim();
    if participant_name.is_empty() {
        return Err(WebServerError::EmptyParticipantName);
    }

    let (session_id, total_items) = server
        .registry
        .lock()
        .await
        .create_session(participant_name)?;

    shared::logging::log_progress(
        "Created session",
        &format!("{participant_name} → {session_id} ({total_items} items)"),
    );

    Ok(Json(StartSessionResponse {
        session_id,
        total_items,
        message: "Session created successfully".to_string(),
    }))
}

/// Return the assigned item sample for one session
async fn session_data_handler<R, F>(
    Path(session_id): Path<String>,
    State(server): State<SurveyServer<R, F>>,
) -> WebServerResult<Json<SessionDataResponse>>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    let (data, participant_name) = server.registry.lock().await.session_data(&session_id)?;
    let total_items = data.len();

    Ok(Json(SessionDataResponse {
        data,
        total_items,
        participant_name,
    }))
}

/// Record one item response (advisory incremental save)
async fn save_response_handler<R, F>(
    Path(session_id): Path<String>,
    State(server): State<SurveyServer<R, F>>,
    Json(request): Json<SaveResponseRequest>,
) -> WebServerResult<Json<AckResponse>>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    let post_index = server.registry.lock().await.record_response(
        &session_id,
        request.item_index,
        request.responses,
    )?;

    tracing::debug!(
        "Saved response for item {} (post {post_index}) in session {session_id}",
        request.item_index
    );

    Ok(Json(AckResponse {
        message: "Response saved successfully".to_string(),
    }))
}

/// Accept the final submission, persist it, and retire the session
async fn submit_handler<R, F>(
    Path(session_id): Path<String>,
    State(server): State<SurveyServer<R, F>>,
    Json(request): Json<SubmitRequest>,
) -> WebServerResult<Json<SubmitResponse>>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    let record = server
        .registry
        .lock()
        .await
        .finalize_submission(&session_id, request)?;

    // Persistence happens outside the registry lock and must succeed before
    // the name is retired; the client retries the whole submit on failure.
    let filename = server.result_store.persist(&record).await?;

    server
        .registry
        .lock()
        .await
        .retire_name(&record.participant_name);

    server.schedule_cleanup(session_id.clone());

    shared::logging::log_success(&format!(
        "Session {session_id} completed by {} and saved as {filename}",
        record.participant_name
    ));

    Ok(Json(SubmitResponse {
        message: "Data submitted successfully".to_string(),
        filename,
    }))
}

/// Assignment-balance metrics and session counters (diagnostic)
async fn stats_handler<R, F>(State(server): State<SurveyServer<R, F>>) -> Json<Value>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    let snapshot = server.registry.lock().await.snapshot();
    let stats = snapshot.assignment_stats;
    let completed_sessions = snapshot.used_names.len();

    let average = if snapshot.total_items > 0 {
        stats.total_assignments as f64 / snapshot.total_items as f64
    } else {
        0.0
    };

    Json(json!({
        "activeSessions": snapshot.active_sessions,
        "totalDataItems": snapshot.total_items,
        "itemsPerUser": snapshot.items_per_session,
        "totalAssignments": stats.total_assignments,
        "averageAssignmentsPerItem": average,
        "minAssignmentsPerItem": stats.min_assignments,
        "maxAssignmentsPerItem": stats.max_assignments,
        "assignmentBalance": stats.max_assignments - stats.min_assignments,
        "usedParticipantNames": snapshot.used_names,
        "totalCompletedSessions": completed_sessions,
        "uptime": server.state.uptime_seconds(),
        "assignmentStats": stats.per_item,
    }))
}

/// Health check endpoint
async fn health_check<R, F>(State(server): State<SurveyServer<R, F>>) -> Json<Value>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": server.state.uptime_seconds(),
    }))
}

/// Serve the frontend entry page
async fn serve_index<R, F>(State(server): State<SurveyServer<R, F>>) -> WebServerResult<Response>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    server.static_files.serve_asset("").await
}

/// Serve dataset and media files
async fn serve_data_file<R, F>(
    Path(path): Path<String>,
    State(server): State<SurveyServer<R, F>>,
) -> WebServerResult<Response>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    server.static_files.serve_data(&path).await
}

/// Serve any other path as a frontend asset
async fn serve_frontend_file<R, F>(
    uri: Uri,
    State(server): State<SurveyServer<R, F>>,
) -> WebServerResult<Response>
where
    R: ResultStore + 'static,
    F: StaticFileServer + 'static,
{
    server.static_files.serve_asset(uri.path()).await
}
