// Groq adapter
// Groq serves an OpenAI-compatible chat completions API:
// https://console.groq.com/docs/api-reference#chat-create

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::config::DEFAULT_GROQ_API_BASE as GROQ_API_BASE;

pub struct GroqAdapter {
    client: Client,
    api_key: String,
    api_base: String,
}

#[derive(Serialize)]
struct GroqChatRequest<'a> {
    model: &'a str,
    messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Deserialize)]
struct GroqChatResponse {
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GroqResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GroqErrorResponse {
    error: GroqError,
}

#[derive(Deserialize)]
struct GroqError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

impl GroqAdapter {
    pub fn new(api_key: &str) -> Self {
        Self::with_api_base(api_key, GROQ_API_BASE)
    }

    /// Point the adapter at another OpenAI-compatible base URL
    pub fn with_api_base(api_key: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl LLMAdapter for GroqAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let body = GroqChatRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Completion(format!("Groq request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<GroqErrorResponse>(&error_text) {
                return Err(AppError::Completion(format!(
                    "Groq API error ({}): {} (type: {:?})",
                    status, error_response.error.message, error_response.error.error_type
                )));
            }

            return Err(AppError::Completion(format!(
                "Groq API error ({}): {}",
                status, error_text
            )));
        }

        let groq_response: GroqChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Completion(format!("Failed to parse Groq response: {}", e)))?;

        let choice = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Completion("Groq returned no choices".to_string()))?;

        if let Some(usage) = &groq_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Groq usage"
            );
        }

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: groq_response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_selection() {
        let adapter = GroqAdapter::new("test-key");
        assert_eq!(adapter.completions_url(), "https://api.groq.com/openai/v1/chat/completions");

        let custom = GroqAdapter::with_api_base("test-key", "http://127.0.0.1:9999/v1/");
        assert_eq!(custom.completions_url(), "http://127.0.0.1:9999/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![LLMMessage::user("hi")];
        let body = GroqChatRequest {
            model: "llama-3.3-70b-versatile",
            messages: &messages,
            max_tokens: Some(4096),
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 4096,
                "stream": false
            })
        );
    }

    #[tokio::test]
    async fn test_returns_first_choice_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[
                    {"index":0,"message":{"role":"assistant","content":"  **first**\n"},"finish_reason":"stop"},
                    {"index":1,"message":{"role":"assistant","content":"second"},"finish_reason":"stop"}
                ],"usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#,
            )
            .create_async()
            .await;

        let adapter = GroqAdapter::with_api_base("test-key", &server.url());
        let request = LLMRequest {
            model: "m".to_string(),
            messages: vec![LLMMessage::user("prompt")],
            max_tokens: Some(16),
        };
        let response = adapter.create_chat_completion(&request).await.unwrap();

        assert_eq!(response.content, "  **first**\n");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, 5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_becomes_completion_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#)
            .create_async()
            .await;

        let adapter = GroqAdapter::with_api_base("bad-key", &server.url());
        let request = LLMRequest {
            model: "m".to_string(),
            messages: vec![LLMMessage::user("prompt")],
            max_tokens: None,
        };
        let err = adapter.create_chat_completion(&request).await.unwrap_err();

        match err {
            AppError::Completion(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Invalid API Key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let adapter = GroqAdapter::with_api_base("key", &server.url());
        let request = LLMRequest {
            model: "m".to_string(),
            messages: vec![LLMMessage::user("prompt")],
            max_tokens: None,
        };
        assert!(matches!(
            adapter.create_chat_completion(&request).await,
            Err(AppError::Completion(_))
        ));
    }
}
