//! Per-session state
//!
//! Each session owns at most one document and an ordered transcript. Sessions
//! never see each other's state; the store only hands out handles.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::documents::ExtractedDocument;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Empty,
    DocumentLoaded,
}

#[derive(Debug, Default)]
pub struct SessionState {
    document: Option<ExtractedDocument>,
    messages: Vec<ChatMessage>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current document. The transcript is left as it is.
    pub fn set_document(&mut self, document: ExtractedDocument) {
        self.document = Some(document);
    }

    // Only the analyst appends, and only after a request has completed.
    pub(crate) fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
            created_at: Utc::now(),
        });
    }

    /// Empty the transcript. The document stays loaded.
    pub fn clear_history(&mut self) {
        self.messages.clear();
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&ExtractedDocument> {
        self.document.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn phase(&self) -> SessionPhase {
        if self.has_document() {
            SessionPhase::DocumentLoaded
        } else {
            SessionPhase::Empty
        }
    }
}

pub type SessionHandle = Arc<Mutex<SessionState>>;

struct SessionEntry {
    handle: SessionHandle,
    last_used: Instant,
}

/// All live sessions, keyed by id
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle: SessionHandle = Arc::new(Mutex::new(SessionState::new()));
        let mut guard = self.inner.write().await;
        guard.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_used: Instant::now(),
            },
        );
        (id, handle)
    }

    /// Look up a session and mark it as used
    pub async fn get(&self, session_id: Uuid) -> AppResult<SessionHandle> {
        let mut guard = self.inner.write().await;
        let entry = guard
            .get_mut(&session_id)
            .ok_or(AppError::SessionNotFound(session_id))?;
        entry.last_used = Instant::now();
        Ok(entry.handle.clone())
    }

    pub async fn remove(&self, session_id: Uuid) -> AppResult<()> {
        let mut guard = self.inner.write().await;
        guard
            .remove(&session_id)
            .map(|_| ())
            .ok_or(AppError::SessionNotFound(session_id))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drop sessions unused for at least `idle_for`. Sessions with a request in
    /// flight still have a handle out and are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, idle_for: Duration) -> usize {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, entry| {
            entry.last_used.elapsed() < idle_for || Arc::strong_count(&entry.handle) > 1
        });
        before - guard.len()
    }

    /// Run `evict_idle` every `every` until the task is aborted
    pub fn spawn_sweeper(&self, idle_for: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(idle_for).await;
                if evicted > 0 {
                    info!(evicted, idle_secs = idle_for.as_secs(), "Evicted idle sessions");
                }
            }
        })
    }
}
