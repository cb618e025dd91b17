//! Document Analyst
//!
//! Runs one user action against one session: upload, question, summary, key
//! points, report, or clear. Session state is written only after the action
//! has fully succeeded, so a failed request leaves the session untouched.

use tracing::{info, warn};

use crate::config::Config;
use crate::documents::{self, ExtractedDocument, UploadedFile};
use crate::llm::CompletionClient;
use crate::prompts::{AnalysisMode, PromptBuilder, SummaryLength};
use crate::session::{Role, SessionState};
use crate::types::{AppError, AppResult};

pub const SUMMARY_HEADING: &str = "**Summary:**";
pub const REPORT_HEADING: &str = "**Analysis Report:**";

#[derive(Clone)]
pub struct DocumentAnalyst {
    client: CompletionClient,
    max_file_size_mb: u64,
    supported_file_types: Vec<String>,
    max_document_chars: Option<usize>,
}

impl DocumentAnalyst {
    pub fn new(client: CompletionClient, config: &Config) -> Self {
        Self {
            client,
            max_file_size_mb: config.app.max_file_size_mb,
            supported_file_types: config.app.supported_file_types.clone(),
            max_document_chars: config.app.max_document_chars,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(CompletionClient::from_config(&config.llm), config)
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    /// Validate, extract and install `file` as the session's document
    pub async fn load_document(
        &self,
        state: &mut SessionState,
        file: UploadedFile,
    ) -> AppResult<ExtractedDocument> {
        info!(filename = %file.filename, size = file.size(), "Processing document");

        documents::validate_upload(&file, self.max_file_size_mb, &self.supported_file_types)?;

        let document = tokio::task::spawn_blocking(move || documents::extract(&file))
            .await
            .map_err(|e| AppError::Extraction(format!("extraction task failed: {}", e)))??;

        state.set_document(document.clone());
        info!(
            filename = %document.filename(),
            chars = document.char_count(),
            "Document loaded successfully"
        );
        Ok(document)
    }

    /// Chat input: build from the selected mode, record the question and the reply
    pub async fn ask(
        &self,
        state: &mut SessionState,
        message: &str,
        mode: AnalysisMode,
        length: &SummaryLength,
    ) -> AppResult<String> {
        if message.trim().is_empty() {
            return Err(AppError::MissingQuestion);
        }

        let text = self.document_text(state)?;
        let prompt = match mode {
            AnalysisMode::Summary => PromptBuilder::build_summary(text, length),
            _ => PromptBuilder::build(text, mode, Some(message))?,
        };

        info!(mode = mode.label(), question_len = message.len(), "Answering chat message");
        let reply = self.client.complete(&prompt).await?;

        state.append_message(Role::User, message);
        state.append_message(Role::Assistant, reply.clone());
        Ok(reply)
    }

    /// "Get Summary" quick action
    pub async fn summarize(&self, state: &mut SessionState, length: &SummaryLength) -> AppResult<String> {
        let prompt = PromptBuilder::build_summary(self.document_text(state)?, length);
        let summary = self.client.complete(&prompt).await?;

        let entry = format!("{}\n\n{}", SUMMARY_HEADING, summary);
        state.append_message(Role::Assistant, entry.clone());
        Ok(entry)
    }

    /// "Extract Key Points" quick action
    pub async fn key_points(&self, state: &mut SessionState) -> AppResult<String> {
        let prompt = PromptBuilder::build(self.document_text(state)?, AnalysisMode::KeyPoints, None)?;
        let points = self.client.complete(&prompt).await?;

        state.append_message(Role::Assistant, points.clone());
        Ok(points)
    }

    /// "Generate Report" quick action
    pub async fn report(&self, state: &mut SessionState) -> AppResult<String> {
        let prompt = PromptBuilder::build(self.document_text(state)?, AnalysisMode::FullReport, None)?;
        let report = self.client.complete(&prompt).await?;

        let entry = format!("{}\n\n{}", REPORT_HEADING, report);
        state.append_message(Role::Assistant, entry.clone());
        Ok(entry)
    }

    /// "Clear Chat": transcript only
    pub fn clear_history(&self, state: &mut SessionState) {
        let cleared = state.messages().len();
        state.clear_history();
        info!(cleared, "Chat history cleared");
    }

    fn document_text<'a>(&self, state: &'a SessionState) -> AppResult<&'a str> {
        let document = state.document().ok_or(AppError::NoDocument)?;

        if let Some(limit) = self.max_document_chars {
            let chars = document.char_count();
            if chars > limit {
                warn!(chars, limit, "Document exceeds configured character limit");
                return Err(AppError::DocumentTooLarge { chars, limit });
            }
        }

        Ok(document.text())
    }
}
