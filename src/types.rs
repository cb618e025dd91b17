// Type definitions and enums

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileKind(String),

    #[error("File too large! Max size: {max_mb}MB")]
    FileTooLarge { size_bytes: usize, max_mb: u64 },

    #[error("Error reading text file: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Error reading PDF: {0}")]
    Extraction(String),

    #[error("A question is required for Q&A analysis")]
    MissingQuestion,

    #[error("Document has {chars} characters, limit is {limit}")]
    DocumentTooLarge { chars: usize, limit: usize },

    #[error("No document loaded in this session")]
    NoDocument,

    #[error("Session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Error calling AI API: {0}")]
    Completion(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Stable machine-readable name, used in JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::UnsupportedFileKind(_) => "unsupported_file_kind",
            AppError::FileTooLarge { .. } => "file_too_large",
            AppError::Decode(_) => "decode_error",
            AppError::Extraction(_) => "extraction_error",
            AppError::MissingQuestion => "missing_question",
            AppError::DocumentTooLarge { .. } => "document_too_large",
            AppError::NoDocument => "no_document",
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Completion(_) => "completion_error",
            AppError::Configuration(_) => "configuration_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFileKind(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::FileTooLarge { .. } | AppError::DocumentTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::Decode(_)
            | AppError::Extraction(_)
            | AppError::MissingQuestion
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NoDocument => StatusCode::CONFLICT,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Completion(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "Request rejected");
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
