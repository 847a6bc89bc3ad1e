//! HTTP-level integration tests for the survey API
//!
//! Drives the router in-process and checks the wire contract the frontend
//! depends on: status codes, error codes, and response field names.

use axum::http::StatusCode;
use serde_json::json;

mod helpers;

use helpers::{get_json, post_json, test_app};

#[tokio::test]
async fn test_start_session_returns_session_id_and_total() {
    let app = test_app(10, 4).await;

    let (status, body) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "Alice" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("sessionId").and_then(|v| v.as_str()).is_some());
    assert_eq!(body.get("totalItems").and_then(|v| v.as_u64()), Some(4));
}

#[tokio::test]
async fn test_participant_name_is_trimmed_before_use() {
    let app = test_app(5, 2).await;

    let (status, _) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "  Alice  " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The trimmed spelling is now in use
    let (status, body) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "Alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.get("code").and_then(|v| v.as_str()), Some("NAME_IN_USE"));
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let app = test_app(5, 2).await;

    for payload in [json!({ "participantName": "" }), json!({ "participantName": "   " }), json!({})] {
        let (status, body) = post_json(&app.router, "/api/start-session", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("error").is_some());
    }
}

#[tokio::test]
async fn test_session_data_returns_assigned_items() {
    let app = test_app(10, 3).await;

    let (_, body) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "Alice" }),
    )
    .await;
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    let (status, body) = get_json(&app.router, &format!("/api/session/{session_id}/data")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participantName"].as_str(), Some("Alice"));
    assert_eq!(body["totalItems"].as_u64(), Some(3));
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    // Each assigned item carries both notes
    for item in body["data"].as_array().unwrap() {
        assert!(item.get("index").is_some());
        assert!(item.get("community_notes").is_some());
        assert!(item.get("LLM_notes").is_some());
    }
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = test_app(5, 2).await;

    let (status, _) = get_json(&app.router, "/api/session/nope/data").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(
        &app.router,
        "/api/session/nope/response",
        json!({ "itemIndex": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(&app.router, "/api/session/nope/submit", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_response_acks_and_rejects_out_of_range() {
    let app = test_app(6, 3).await;

    let (_, body) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "Alice" }),
    )
    .await;
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    let payload = json!({
        "itemIndex": 1,
        "responses": serde_json::to_value(fixtures::sample_response(0)).unwrap()
    });
    let (status, body) = post_json(
        &app.router,
        &format!("/api/session/{session_id}/response"),
        payload,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"].as_str(), Some("Response saved successfully"));

    // Positions outside the assigned sample are rejected
    let (status, _) = post_json(
        &app.router,
        &format!("/api/session/{session_id}/response"),
        json!({ "itemIndex": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_persists_record_and_blocks_name() {
    let app = test_app(5, 2).await;

    let (_, body) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "Alice" }),
    )
    .await;
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    let submission = json!({
        "userResponses": {
            "0": serde_json::to_value(fixtures::sample_response(0)).unwrap()
        },
        "totalItems": 2,
        "sessionSummary": { "evaluatedPosts": 1, "startTime": "unknown" }
    });
    let (status, body) = post_json(
        &app.router,
        &format!("/api/session/{session_id}/submit"),
        submission,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let filename = body["filename"].as_str().unwrap();
    assert!(app.results_dir.path().join(filename).is_file());

    // The name is permanently blocked from this point on
    let (status, body) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "Alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"].as_str(), Some("DUPLICATE_NAME"));
}

#[tokio::test]
async fn test_duplicate_submit_within_grace_wins_last() {
    let app = test_app(5, 2).await;

    let (_, body) = post_json(
        &app.router,
        "/api/start-session",
        json!({ "participantName": "Alice" }),
    )
    .await;
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    let first = json!({ "totalItems": 1 });
    let (status, body_first) = post_json(
        &app.router,
        &format!("/api/session/{session_id}/submit"),
        first,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Session is still resolvable inside the grace window; the retry
    // replaces the stored payload under the same filename
    let second = json!({ "totalItems": 2 });
    let (status, body_second) = post_json(
        &app.router,
        &format!("/api/session/{session_id}/submit"),
        second,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body_first["filename"], body_second["filename"]);

    let raw = std::fs::read_to_string(
        app.results_dir
            .path()
            .join(body_second["filename"].as_str().unwrap()),
    )
    .unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["totalItemsAssigned"].as_u64(), Some(2));
}

#[tokio::test]
async fn test_stats_reports_assignment_balance() {
    let app = test_app(5, 3).await;

    for name in ["Alice", "Bob", "Carol"] {
        let (status, _) = post_json(
            &app.router,
            "/api/start-session",
            json!({ "participantName": name }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_json(&app.router, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activeSessions"].as_u64(), Some(3));
    assert_eq!(body["totalDataItems"].as_u64(), Some(5));
    assert_eq!(body["itemsPerUser"].as_u64(), Some(3));
    assert_eq!(body["totalAssignments"].as_u64(), Some(9));
    // 9 draws over 5 posts: every post at 1 or 2, spread exactly 1
    assert_eq!(body["minAssignmentsPerItem"].as_u64(), Some(1));
    assert_eq!(body["maxAssignmentsPerItem"].as_u64(), Some(2));
    assert_eq!(body["assignmentBalance"].as_u64(), Some(1));
    assert_eq!(body["totalCompletedSessions"].as_u64(), Some(0));
    assert_eq!(body["assignmentStats"].as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn test_health_check_reports_ok() {
    let app = test_app(5, 2).await;

    let (status, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"].as_str(), Some("OK"));
    assert!(body.get("timestamp").is_some());
}

#[tokio::test]
async fn test_frontend_and_missing_assets() {
    let app = test_app(5, 2).await;

    let (status, _) = get_json(&app.router, "/").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_json(&app.router, "/no-such-page.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
