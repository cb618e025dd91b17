use crate::agents::DocumentAnalyst;
use crate::config::Config;
use crate::documents::{ExtractedDocument, FileKind};
use crate::prompts::AnalysisMode;
use crate::session::{ChatMessage, SessionPhase, SessionState, SessionStore};
use crate::utils::truncate_text;

/// Characters of document text shown in the session preview
pub const PREVIEW_CHARS: usize = 500;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub analyst: DocumentAnalyst,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let analyst = DocumentAnalyst::from_config(&config);
        Self::with_analyst(config, analyst)
    }

    pub fn with_analyst(config: Config, analyst: DocumentAnalyst) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
            analyst,
        }
    }
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub mode: AnalysisMode,
    pub summary_length: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct SummaryRequest {
    pub length: Option<String>,
}

/// Reply to any request that produced model output
#[derive(Debug, serde::Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub message_count: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct CreateSessionResponse {
    pub session_id: uuid::Uuid,
}

#[derive(Debug, serde::Serialize)]
pub struct DocumentInfo {
    pub filename: String,
    pub kind: FileKind,
    pub size_bytes: usize,
    pub characters: usize,
    pub preview: String,
}

impl From<&ExtractedDocument> for DocumentInfo {
    fn from(document: &ExtractedDocument) -> Self {
        Self {
            filename: document.filename().to_string(),
            kind: document.kind(),
            size_bytes: document.source_len(),
            characters: document.char_count(),
            preview: truncate_text(document.text(), PREVIEW_CHARS),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SessionView {
    pub session_id: uuid::Uuid,
    pub phase: SessionPhase,
    pub document: Option<DocumentInfo>,
    pub messages: Vec<ChatMessage>,
}

impl SessionView {
    pub fn new(session_id: uuid::Uuid, state: &SessionState) -> Self {
        Self {
            session_id,
            phase: state.phase(),
            document: state.document().map(DocumentInfo::from),
            messages: state.messages().to_vec(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub app_name: String,
    pub model: String,
    pub active_sessions: usize,
}
