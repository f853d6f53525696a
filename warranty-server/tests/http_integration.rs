//! HTTP integration tests for the Warranty Assistant REST API
//!
//! Full axum dispatch through `oneshot`, over the memory session store and a
//! temp-dir knowledge index. No external services are needed.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use warranty_server::http::{build_router, HttpState};

use common::{test_app, ScriptedModel, TestApp};

fn router(app: &TestApp) -> axum::Router {
    build_router(Arc::new(HttpState {
        ctx: app.ctx.clone(),
    }))
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router(app).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn post_query(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ===========================================================================
// TEST 1: GET /version
// ===========================================================================
#[tokio::test]
async fn test_version_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), ScriptedModel::replying("unused"));

    let (status, body) = send(&app, get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["protocol"], "warranty/1");
}

// ===========================================================================
// TEST 2: GET /health before and after the index loads
// ===========================================================================
#[tokio::test]
async fn test_health_endpoint_reports_index_size() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), ScriptedModel::replying("unused"));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_store"], "memory");
    assert_eq!(body["snippets"], 0);

    app.index.ensure_loaded().await.unwrap();
    let (_, body) = send(&app, get("/health")).await;
    assert_eq!(body["snippets"], 59);
}

// ===========================================================================
// TEST 3: POST /api/query validation
// ===========================================================================
#[tokio::test]
async fn test_query_missing_username_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), ScriptedModel::replying("unused"));

    let (status, body) = send(&app, post_query(json!({ "prompt": "hi", "userId": "u-1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No username provided");
}

// ===========================================================================
// TEST 4: POST /api/query happy path then history endpoints
// ===========================================================================
#[tokio::test]
async fn test_query_then_read_history() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), ScriptedModel::replying("Warranty Coverage: 1 year."));

    let (status, body) = send(
        &app,
        post_query(json!({
            "prompt": "What is the Voltas air cooler warranty?",
            "userId": "u-http",
            "username": "Hana"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["response"], "Warranty Coverage: 1 year.");
    assert!(body["took_ms"].is_u64());
    let session_id = body["sessionId"].as_str().unwrap().to_string();

    let (status, history) = send(&app, get("/api/chat-history/u-http")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["total_sessions"], 1);
    assert_eq!(history["sessions"][0]["id"], session_id.as_str());
    assert_eq!(
        history["sessions"][0]["messages"].as_array().unwrap().len(),
        2
    );

    let (status, session) =
        send(&app, get(&format!("/api/chat-history/u-http/{session_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["messages"][1]["role"], "assistant");
    assert_eq!(session["messages"][1]["content"], "Warranty Coverage: 1 year.");

    let (status, _) = send(&app, get(&format!("/api/chat-history/u-other/{session_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ===========================================================================
// TEST 5: pipeline failure surfaces as 500 with an error message
// ===========================================================================
#[tokio::test]
async fn test_query_generation_failure_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), ScriptedModel::failing());

    let (status, body) = send(
        &app,
        post_query(json!({
            "prompt": "Panasonic TV screen flickering",
            "userId": "u-fail",
            "username": "Ivan"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("overloaded"));

    let (_, history) = send(&app, get("/api/chat-history/u-fail")).await;
    assert_eq!(history["sessions"][0]["messages"].as_array().unwrap().len(), 0);
}

// ===========================================================================
// TEST 6: a non-UUID sessionId is ignored, the turn still succeeds
// ===========================================================================
#[tokio::test]
async fn test_query_with_legacy_session_id_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), ScriptedModel::replying("unused"));

    let (status, body) = send(
        &app,
        post_query(json!({
            "prompt": "hi",
            "userId": "u-legacy",
            "username": "Alice",
            "sessionId": "65f1c0ffee0123456789abcd"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert!(body["response"].as_str().unwrap().starts_with("👋 Hi Alice!"));
    assert_ne!(body["sessionId"], "65f1c0ffee0123456789abcd");
}

// ===========================================================================
// TEST 7: malformed bodies get a 400 error object, not a bare rejection
// ===========================================================================
#[tokio::test]
async fn test_query_malformed_body_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path(), ScriptedModel::replying("unused"));

    let (status, body) = send(
        &app,
        post_query(json!({ "prompt": "hi", "userId": 42, "username": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    let req = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}
