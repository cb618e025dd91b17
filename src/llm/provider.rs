use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMMessage, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Sends one prompt at a time to the configured chat model.
///
/// Model and token budget are fixed at construction. Every call is a single
/// user message with no history and no system prompt, attempted exactly once.
#[derive(Clone)]
pub struct CompletionClient {
    adapter: Arc<dyn LLMAdapter>,
    model: String,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(adapter: Arc<dyn LLMAdapter>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            adapter,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn from_config(config: &LLMConfig) -> Self {
        let adapter = crate::llm::groq::GroqAdapter::with_api_base(&config.api_key, &config.api_base);
        Self::new(Arc::new(adapter), config.model.clone(), config.max_tokens)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, prompt: &str) -> AppResult<String> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: Some(self.max_tokens),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");

        match self.adapter.create_chat_completion(&request).await {
            Ok(response) => {
                info!(
                    model = %self.model,
                    response_len = response.content.len(),
                    finish_reason = ?response.finish_reason,
                    "Completion received"
                );
                Ok(response.content)
            }
            Err(e) => {
                error!(model = %self.model, error = %e, "Completion failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::types::AppError;
    use std::sync::Mutex;

    /// Adapter that records requests and replies from a script
    #[derive(Default)]
    pub struct ScriptedAdapter {
        pub requests: Mutex<Vec<LLMRequest>>,
        replies: Mutex<Vec<AppResult<String>>>,
    }

    impl ScriptedAdapter {
        pub fn replying(replies: Vec<AppResult<String>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self {
                requests: Mutex::new(Vec::new()),
                replies: Mutex::new(replies),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.requests
                .lock()
                .unwrap()
                .last()
                .and_then(|r| r.messages.first().map(|m| m.content.clone()))
        }
    }

    #[async_trait]
    impl LLMAdapter for ScriptedAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.requests.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(AppError::Completion("script exhausted".to_string())));
            reply.map(|content| LLMResponse {
                content,
                finish_reason: Some("stop".to_string()),
                usage: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedAdapter;
    use super::*;
    use crate::types::AppError;

    #[tokio::test]
    async fn test_single_user_message_with_configured_budget() {
        let adapter = Arc::new(ScriptedAdapter::replying(vec![Ok("answer".to_string())]));
        let client = CompletionClient::new(adapter.clone(), "llama-3.3-70b-versatile", 4096);

        let reply = client.complete("the prompt").await.unwrap();
        assert_eq!(reply, "answer");

        let requests = adapter.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "llama-3.3-70b-versatile");
        assert_eq!(requests[0].max_tokens, Some(4096));
        assert_eq!(requests[0].messages, vec![LLMMessage::user("the prompt")]);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let adapter = Arc::new(ScriptedAdapter::replying(vec![
            Err(AppError::Completion("connection reset".to_string())),
            Ok("never reached".to_string()),
        ]));
        let client = CompletionClient::new(adapter.clone(), "m", 10);

        let err = client.complete("p").await.unwrap_err();
        assert!(matches!(err, AppError::Completion(_)));
        assert_eq!(adapter.request_count(), 1);
    }
}
