// Quick actions: summary, key points, full report

use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::models::{AppState, ChatResponse, SummaryRequest};
use crate::prompts::SummaryLength;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions/{session_id}/summary", post(summary_handler))
        .route("/api/sessions/{session_id}/key-points", post(key_points_handler))
        .route("/api/sessions/{session_id}/report", post(report_handler))
        .with_state(state)
}

async fn summary_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(request): Query<SummaryRequest>,
) -> AppResult<Json<ChatResponse>> {
    info!(session_id = %session_id, length = ?request.length, "Summary requested");

    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;

    let length = SummaryLength::from(request.length.as_deref());
    let text = state.analyst.summarize(&mut session, &length).await?;

    Ok(Json(ChatResponse {
        text,
        message_count: session.messages().len(),
    }))
}

async fn key_points_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<ChatResponse>> {
    info!(session_id = %session_id, "Key points requested");

    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let text = state.analyst.key_points(&mut session).await?;

    Ok(Json(ChatResponse {
        text,
        message_count: session.messages().len(),
    }))
}

async fn report_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<ChatResponse>> {
    info!(session_id = %session_id, "Report requested");

    let handle = state.sessions.get(session_id).await?;
    let mut session = handle.lock().await;
    let text = state.analyst.report(&mut session).await?;

    Ok(Json(ChatResponse {
        text,
        message_count: session.messages().len(),
    }))
}
