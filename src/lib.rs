// Doc Analyzer - chat with an uploaded PDF or text document through a hosted LLM

pub mod config;
pub mod types;
pub mod models;
pub mod documents; // Text extraction from PDF and TXT uploads
pub mod prompts;
pub mod llm;
pub mod session;
pub mod agents;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
