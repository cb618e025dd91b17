//! API Routes
//!
//! Every user action maps to one endpoint under a session:
//! - `/api/sessions` - Create, inspect and tear down sessions, clear chat history
//! - `/api/sessions/{session_id}/document` - Document upload (multipart)
//! - `/api/sessions/{session_id}/chat` - Questions in the selected analysis mode
//! - `/api/sessions/{session_id}/{summary,key-points,report}` - Quick actions
//! - `/api/health` - Health check
//! - `/` - Minimal browser UI

pub mod analysis;
pub mod chat;
pub mod files;
pub mod health;
pub mod sessions;
pub mod ui;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(sessions::router(state.clone()))
        .merge(files::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(analysis::router(state.clone()))
        .merge(health::router(state.clone()));

    let app = Router::new().merge(api_router).merge(ui::router(state));

    apply_cors(app, &origins).layer(TraceLayer::new_for_http())
}
