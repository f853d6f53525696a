//! Session persistence
//!
//! One active `ChatSession` per user, holding an append-only message log.
//! Three implementations are selected once at startup:
//! - `PgSessionStore`: Postgres, messages in a JSONB column
//! - `MemorySessionStore`: in-process, for development and tests
//! - `NullSessionStore`: degraded mode; reads are empty and writes succeed
//!   without effect

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{ChatMessage, ChatSession};

#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Chat session {0} not found")]
    NotFound(Uuid),

    #[error("Could not resolve an active session for user {0}")]
    Conflict(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the user's active session, creating an empty one if none exists.
    /// An existing session gets its `login_time` refreshed; its messages are untouched.
    async fn get_or_create_active(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<ChatSession, SessionStoreError>;

    /// Append the user question and the assistant answer, in that order, as
    /// one atomic write, and bump `updated_at`.
    async fn append_turn(
        &self,
        session_id: Uuid,
        question: &str,
        answer: &str,
    ) -> Result<(), SessionStoreError>;

    /// The last `limit` messages, oldest first. Unknown sessions yield an empty list.
    async fn recent_messages(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, SessionStoreError>;

    /// All sessions of a user, newest first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, SessionStoreError>;

    /// One session, only if it belongs to `user_id`.
    async fn get_session(
        &self,
        user_id: &str,
        session_id: Uuid,
    ) -> Result<Option<ChatSession>, SessionStoreError>;

    /// Backend name for logging and health output.
    fn name(&self) -> &str;
}

fn turn_messages(question: &str, answer: &str, now: DateTime<Utc>) -> Vec<ChatMessage> {
    vec![ChatMessage::user(question, now), ChatMessage::assistant(answer, now)]
}

// ============================================================================
// PgSessionStore
// ============================================================================

const SESSION_COLUMNS: &str =
    "id, user_id, display_name, active, messages, created_at, updated_at, login_time";

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: String,
    display_name: String,
    active: bool,
    messages: Json<Vec<ChatMessage>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    login_time: DateTime<Utc>,
}

impl From<SessionRow> for ChatSession {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            display_name: row.display_name,
            active: row.active,
            messages: row.messages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            login_time: row.login_time,
        }
    }
}

/// Postgres-backed store. Requires the schema from `db::ensure_schema`.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_active(&self, user_id: &str) -> Result<Option<ChatSession>, SessionStoreError> {
        let row: Option<SessionRow> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM chat_sessions
             WHERE user_id = $1 AND active
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ChatSession::from))
    }

    async fn touch_login(&self, session_id: Uuid) -> Result<Option<ChatSession>, SessionStoreError> {
        let row: Option<SessionRow> = sqlx::query_as(&format!(
            "UPDATE chat_sessions SET login_time = $2 WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        ))
        .bind(session_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ChatSession::from))
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get_or_create_active(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<ChatSession, SessionStoreError> {
        if let Some(existing) = self.find_active(user_id).await? {
            if let Some(session) = self.touch_login(existing.id).await? {
                return Ok(session);
            }
        }

        let fresh = ChatSession::new(user_id, display_name);
        // A concurrent first turn for the same user loses on the partial
        // unique index and falls through to read the winner.
        let inserted: Option<SessionRow> = sqlx::query_as(&format!(
            "INSERT INTO chat_sessions ({SESSION_COLUMNS})
             VALUES ($1, $2, $3, TRUE, $4, $5, $5, $5)
             ON CONFLICT DO NOTHING
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(fresh.id)
        .bind(&fresh.user_id)
        .bind(&fresh.display_name)
        .bind(Json(&fresh.messages))
        .bind(fresh.created_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            tracing::info!(user_id = %user_id, session_id = %row.id, "Created chat session");
            return Ok(row.into());
        }

        tracing::debug!(user_id = %user_id, "Lost session creation race, reading winner");
        match self.find_active(user_id).await? {
            Some(winner) => Ok(self.touch_login(winner.id).await?.unwrap_or(winner)),
            None => Err(SessionStoreError::Conflict(user_id.to_string())),
        }
    }

    async fn append_turn(
        &self,
        session_id: Uuid,
        question: &str,
        answer: &str,
    ) -> Result<(), SessionStoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE chat_sessions
             SET messages = messages || $2, updated_at = $3
             WHERE id = $1",
        )
        .bind(session_id)
        .bind(Json(turn_messages(question, answer, now)))
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SessionStoreError::NotFound(session_id));
        }
        Ok(())
    }

    async fn recent_messages(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, SessionStoreError> {
        let row: Option<(Json<Vec<ChatMessage>>,)> =
            sqlx::query_as("SELECT messages FROM chat_sessions WHERE id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row
            .map(|(Json(mut messages),)| {
                let start = messages.len().saturating_sub(limit);
                messages.split_off(start)
            })
            .unwrap_or_default())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, SessionStoreError> {
        let rows: Vec<SessionRow> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM chat_sessions
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ChatSession::from).collect())
    }

    async fn get_session(
        &self,
        user_id: &str,
        session_id: Uuid,
    ) -> Result<Option<ChatSession>, SessionStoreError> {
        let row: Option<SessionRow> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM chat_sessions WHERE id = $1 AND user_id = $2"
        ))
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ChatSession::from))
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

// ============================================================================
// MemorySessionStore
// ============================================================================

/// In-process store. One mutex guards every operation, so lookup-then-create
/// cannot produce two active sessions for a user.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, ChatSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_or_create_active(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<ChatSession, SessionStoreError> {
        let mut sessions = self.sessions.lock().await;

        if let Some(existing) = sessions
            .values_mut()
            .find(|s| s.active && s.user_id == user_id)
        {
            existing.login_time = Utc::now();
            return Ok(existing.clone());
        }

        let session = ChatSession::new(user_id, display_name);
        sessions.insert(session.id, session.clone());
        tracing::info!(user_id = %user_id, session_id = %session.id, "Created chat session");
        Ok(session)
    }

    async fn append_turn(
        &self,
        session_id: Uuid,
        question: &str,
        answer: &str,
    ) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(SessionStoreError::NotFound(session_id))?;

        let now = Utc::now();
        session.messages.extend(turn_messages(question, answer, now));
        session.updated_at = now;
        Ok(())
    }

    async fn recent_messages(
        &self,
        session_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, SessionStoreError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(&session_id)
            .map(|s| s.recent(limit).to_vec())
            .unwrap_or_default())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, SessionStoreError> {
        let sessions = self.sessions.lock().await;
        let mut owned: Vec<ChatSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn get_session(
        &self,
        user_id: &str,
        session_id: Uuid,
    ) -> Result<Option<ChatSession>, SessionStoreError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(&session_id)
            .filter(|s| s.user_id == user_id)
            .cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// NullSessionStore
// ============================================================================

/// Degraded-mode store used when persistence is unavailable. Reads return
/// nothing, writes succeed without storing anything, and every turn gets a
/// transient empty session.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSessionStore;

#[async_trait]
impl SessionStore for NullSessionStore {
    async fn get_or_create_active(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<ChatSession, SessionStoreError> {
        Ok(ChatSession::new(user_id, display_name))
    }

    async fn append_turn(
        &self,
        _session_id: Uuid,
        _question: &str,
        _answer: &str,
    ) -> Result<(), SessionStoreError> {
        Ok(())
    }

    async fn recent_messages(
        &self,
        _session_id: Uuid,
        _limit: usize,
    ) -> Result<Vec<ChatMessage>, SessionStoreError> {
        Ok(Vec::new())
    }

    async fn list_sessions(&self, _user_id: &str) -> Result<Vec<ChatSession>, SessionStoreError> {
        Ok(Vec::new())
    }

    async fn get_session(
        &self,
        _user_id: &str,
        _session_id: Uuid,
    ) -> Result<Option<ChatSession>, SessionStoreError> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// TESTS
// ============================================================================
