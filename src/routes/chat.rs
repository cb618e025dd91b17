use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::models::{AppState, ChatRequest, ChatResponse};
use crate::prompts::SummaryLength;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions/{session_id}/chat", post(post_chat))
        .with_state(state)
}

pub async fn post_chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    info!(session_id = %session_id, mode = request.mode.label(), "Received chat request");

    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;

    let length = SummaryLength::from(request.summary_length.as_deref());
    let text = state
        .analyst
        .ask(&mut session, &request.message, request.mode, &length)
        .await?;

    Ok(Json(ChatResponse {
        text,
        message_count: session.messages().len(),
    }))
}
