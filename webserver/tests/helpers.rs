//! Shared harness for driving the survey router in-process

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

use webserver::core::{ItemPool, StudyRegistry};
use webserver::{RealResultStore, RealStaticFileServer, ServerState, SurveyServer};


/// A router wired to real services over temporary directories
pub struct TestApp {
    pub router: Router,
    pub results_dir: TempDir,
    frontend_dir: TempDir,
    data_dir: TempDir,
}

/// Build a test app over a fresh pool of `n_items` posts
pub async fn test_app(n_items: u64, items_per_session: usize) -> TestApp {
    test_app_with(n_items, items_per_session, Duration::from_secs(60), None).await
}

/// Build a test app with full control over grace delay and results location
pub async fn test_app_with(
    n_items: u64,
    items_per_session: usize,
    cleanup_grace: Duration,
    results_path: Option<&std::path::Path>,
) -> TestApp {
    let results_dir = TempDir::new().unwrap();
    let frontend_dir = TempDir::new().unwrap();
    std::fs::write(frontend_dir.path().join("index.html"), "<html>study</html>").unwrap();
    let data_dir = TempDir::new().unwrap();

    let pool = ItemPool::new(fixtures::sample_items(n_items)).unwrap();

    let store_path = results_path.unwrap_or_else(|| results_dir.path());
    let result_store = RealResultStore::new(store_path);

    // Rebuild the ledger the way startup does
    let used_names: HashSet<String> = {
        use webserver::traits::ResultStore;
        result_store.load_used_names().await.unwrap()
    };

    let registry = StudyRegistry::new(pool, used_names, items_per_session);
    let static_files = RealStaticFileServer::new(frontend_dir.path(), data_dir.path());
    let state = ServerState::new(
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        cleanup_grace,
    );

    let server = SurveyServer::new(state, registry, result_store, static_files);

    TestApp {
        router: server.build_router(),
        results_dir,
        frontend_dir,
        data_dir,
    }
}

/// POST a JSON body and return status plus parsed response body
pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(router, request).await
}

/// GET a path and return status plus parsed response body
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}
