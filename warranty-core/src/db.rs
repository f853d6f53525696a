use crate::config::DatabaseConfig;
use crate::error::WarrantyError;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Table and partial unique index backing `PgSessionStore`.
///
/// The unique index on `(user_id) WHERE active` makes the one-active-session
/// rule a storage guarantee instead of a lookup-then-create convention.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS chat_sessions (
        id UUID PRIMARY KEY,
        user_id TEXT NOT NULL,
        display_name TEXT NOT NULL DEFAULT '',
        active BOOLEAN NOT NULL DEFAULT TRUE,
        messages JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        login_time TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS chat_sessions_one_active_per_user
        ON chat_sessions (user_id) WHERE active
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS chat_sessions_user_created
        ON chat_sessions (user_id, created_at DESC)
    "#,
];

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await
}

pub async fn health_check(pool: &PgPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}

/// Create the session tables if they do not exist yet. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), WarrantyError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("chat_sessions schema ensured");
    Ok(())
}

/// Connect and prepare the schema in one step, as the server does at startup.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, WarrantyError> {
    let pool = create_pool(config).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}
