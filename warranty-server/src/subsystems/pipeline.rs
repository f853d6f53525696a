//! Pipeline coordinator: handle one user turn end to end
//!
//! resolve session → classify → { canned reply | search → generate } → append
//!
//! A turn is appended to the session only once an answer exists. When
//! generation fails the error is returned and the session is left untouched.

use thiserror::Error;
use warranty_core::generation::GenerationError;
use warranty_core::index::IndexError;
use warranty_core::models::{TurnRequest, TurnResponse};
use warranty_core::session_store::SessionStoreError;

use crate::context::AppContext;
use crate::subsystems::classify::{canned_response, classify};

/// Reply used when retrieval finds no relevant snippet.
pub const NO_MATCH_RESPONSE: &str = "❌ No matching warranty information found.";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Session store error: {0}")]
    Session(#[from] SessionStoreError),

    #[error("Knowledge index error: {0}")]
    Index(#[from] IndexError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Run one turn. `request` must already be validated by the caller.
pub async fn handle_turn(
    ctx: &AppContext,
    request: TurnRequest,
) -> Result<TurnResponse, PipelineError> {
    let session = ctx
        .sessions
        .get_or_create_active(&request.user_id, &request.display_name)
        .await?;

    if let Some(hint) = request.session_id {
        if hint != session.id {
            tracing::debug!(
                user_id = %request.user_id,
                hint = %hint,
                active = %session.id,
                "Ignoring session id hint, using active session"
            );
        }
    }

    let classification = classify(&request.question);
    tracing::info!(
        user_id = %request.user_id,
        session_id = %session.id,
        kind = classification.kind(),
        "Handling turn"
    );

    let answer = match canned_response(classification, &request.question, &request.display_name) {
        Some(reply) => reply,
        None => retrieve_and_answer(ctx, session.id, &request.question).await?,
    };

    ctx.sessions
        .append_turn(session.id, &request.question, &answer)
        .await?;

    tracing::info!(
        session_id = %session.id,
        kind = classification.kind(),
        answer_chars = answer.chars().count(),
        "Turn complete"
    );

    Ok(TurnResponse {
        answer,
        session_id: session.id,
    })
}

async fn retrieve_and_answer(
    ctx: &AppContext,
    session_id: uuid::Uuid,
    question: &str,
) -> Result<String, PipelineError> {
    let snippets = ctx.index.search(question, ctx.retrieval.top_k).await?;
    if snippets.is_empty() {
        tracing::info!(session_id = %session_id, "No matching snippets");
        return Ok(NO_MATCH_RESPONSE.to_string());
    }

    let history = ctx
        .sessions
        .recent_messages(session_id, ctx.retrieval.history_limit)
        .await?;

    match ctx.generator.generate(&snippets, question, &history).await {
        Ok(answer) => Ok(answer),
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Answer generation failed");
            Err(e.into())
        }
    }
}
