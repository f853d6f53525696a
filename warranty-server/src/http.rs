//! Warranty Assistant HTTP API
//!
//! Axum server exposing the turn pipeline and read-only chat history.
//!
//! Each endpoint has a thin axum handler that delegates to an inner function
//! returning `(StatusCode, serde_json::Value)`, so the business logic is
//! testable without going through axum dispatch.
//!
//! Endpoints:
//! - GET  /health                                   status, session store, index size
//! - GET  /version                                  server version info
//! - POST /api/query                                handle one user turn
//! - GET  /api/chat-history/:user_id                all sessions of a user
//! - GET  /api/chat-history/:user_id/:session_id    one session

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use uuid::Uuid;
use warranty_core::config::HttpConfig;
use warranty_core::models::TurnRequest;

use crate::context::AppContext;
use crate::subsystems::pipeline::handle_turn;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub ctx: AppContext,
}

pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/api/query", post(query_handler))
        .route("/api/chat-history/:user_id", get(history_handler))
        .route(
            "/api/chat-history/:user_id/:session_id",
            get(session_handler),
        )
        .with_state(state)
}

/// Serve until the broadcast shutdown signal fires.
pub async fn start_http_server(
    ctx: AppContext,
    config: HttpConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(HttpState { ctx });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Warranty HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

/// Body of `POST /api/query`. Field names follow the web client.
///
/// `sessionId` is opaque: older clients send ids that are not UUIDs, and
/// those are dropped rather than failing the turn.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub prompt: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub session_id: Option<String>,
}

impl From<QueryRequest> for TurnRequest {
    fn from(req: QueryRequest) -> Self {
        TurnRequest {
            question: req.prompt.unwrap_or_default(),
            user_id: req.user_id.unwrap_or_default(),
            display_name: req.username.unwrap_or_default(),
            session_id: req
                .session_id
                .and_then(|id| Uuid::parse_str(id.trim()).ok()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }

    fn into_value(self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

pub async fn health_inner(ctx: &AppContext) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "session_store": ctx.sessions.name(),
            "snippets": ctx.index.snippet_count().await,
            "model": ctx.generator.model_name(),
        }),
    )
}

pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "warranty/1",
    })
}

/// Validate the body, run the turn, and map pipeline errors to 500.
pub async fn query_inner(ctx: &AppContext, req: QueryRequest) -> (StatusCode, serde_json::Value) {
    let turn = match TurnRequest::from(req).validate() {
        Ok(t) => t,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(e.to_string()).into_value(),
            );
        }
    };

    let start = Instant::now();
    match handle_turn(ctx, turn).await {
        Ok(resp) => (
            StatusCode::OK,
            serde_json::json!({
                "response": resp.answer,
                "sessionId": resp.session_id,
                "took_ms": start.elapsed().as_millis() as u64,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(e.to_string()).into_value(),
            )
        }
    }
}

pub async fn history_inner(ctx: &AppContext, user_id: &str) -> (StatusCode, serde_json::Value) {
    match ctx.sessions.list_sessions(user_id).await {
        Ok(sessions) => (
            StatusCode::OK,
            serde_json::json!({
                "total_sessions": sessions.len(),
                "sessions": sessions,
            }),
        ),
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "Failed to list chat sessions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(e.to_string()).into_value(),
            )
        }
    }
}

/// Unknown and malformed session ids are both reported as not found.
pub async fn session_inner(
    ctx: &AppContext,
    user_id: &str,
    session_id: &str,
) -> (StatusCode, serde_json::Value) {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("Chat session not found").into_value(),
        )
    };

    let Ok(session_id) = Uuid::parse_str(session_id) else {
        return not_found();
    };

    match ctx.sessions.get_session(user_id, session_id).await {
        Ok(Some(session)) => (
            StatusCode::OK,
            serde_json::to_value(session).unwrap_or_else(|_| serde_json::json!({})),
        ),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "Failed to read chat session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(e.to_string()).into_value(),
            )
        }
    }
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.ctx).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn query_handler(
    State(state): State<Arc<HttpState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let (status, body) = match payload {
        Ok(Json(req)) => query_inner(&state.ctx, req).await,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected query body");
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(format!("Invalid request body: {}", rejection.body_text()))
                    .into_value(),
            )
        }
    };
    (status, Json(body))
}

pub async fn history_handler(
    State(state): State<Arc<HttpState>>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = history_inner(&state.ctx, &user_id).await;
    (status, Json(body))
}

pub async fn session_handler(
    State(state): State<Arc<HttpState>>,
    Path((user_id, session_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let (status, body) = session_inner(&state.ctx, &user_id, &session_id).await;
    (status, Json(body))
}

// ============================================================================
// Unit Tests: call inner functions directly
// ============================================================================
