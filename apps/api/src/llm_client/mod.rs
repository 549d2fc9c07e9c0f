/// LLM Client — the single point of entry for all completion API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Groq API directly.
/// All LLM interactions MUST go through the `CompletionClient` trait.
///
/// Model: llama-3.3-70b-versatile (hardcoded — do not make configurable to prevent drift)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all completion calls.
pub const MODEL: &str = "llama-3.3-70b-versatile";
/// Transport-level deadline for a single completion call. The generator races
/// each call against its own, shorter deadline on top of this one.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_TOKENS: u32 = 256;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Completion API key not configured")]
    Config,

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Completion request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Whether the caller may try the same call again within its budget.
    /// Credential and request-shape problems never heal on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Config | LlmError::EmptyPrompt => false,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Timeout(_)
            | LlmError::Transport(_)
            | LlmError::Parse(_)
            | LlmError::EmptyContent => true,
        }
    }
}

/// A text-completion backend. One call, one outbound request, no internal retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the trimmed text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GroqError {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}

/// Wraps the Groq chat completions API (OpenAI-compatible wire format).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    /// Fails with `LlmError::Config` when the key is blank, before any network call.
    pub fn new(api_key: String, api_url: Option<String>) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Config);
        }

        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            api_url: api_url.unwrap_or_else(|| GROQ_API_URL.to_string()),
        })
    }

    /// Makes a raw call to the completion API, returning the full response object.
    async fn call(&self, prompt: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GroqError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Completion API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "Completion call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::EmptyPrompt);
        }

        debug!("Sending prompt to completion API ({} chars)", prompt.len());

        // Whichever finishes first wins; a late response is dropped with its future.
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.call(prompt))
            .await
            .map_err(|_| LlmError::Timeout(REQUEST_TIMEOUT))??;

        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_blank_api_key() {
        assert!(matches!(
            LlmClient::new("   ".to_string(), None),
            Err(LlmError::Config)
        ));
    }

    #[tokio::test]
    async fn test_complete_rejects_empty_prompt_without_network() {
        let client = LlmClient::new("key".to_string(), Some("http://127.0.0.1:9".to_string()))
            .unwrap();
        let err = client.complete("  ").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyPrompt));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_response_text_takes_first_choice_trimmed() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "  What made you laugh today?\n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), Some("What made you laugh today?"));
    }

    #[test]
    fn test_response_text_none_for_blank_content() {
        let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_retry_classification() {
        assert!(LlmError::Timeout(REQUEST_TIMEOUT).is_retryable());
        assert!(LlmError::EmptyContent.is_retryable());
        assert!(LlmError::Api {
            status: 503,
            message: "overloaded".to_string()
        }
        .is_retryable());
        assert!(LlmError::Api {
            status: 429,
            message: "slow down".to_string()
        }
        .is_retryable());
        assert!(!LlmError::Api {
            status: 401,
            message: "bad key".to_string()
        }
        .is_retryable());
        assert!(!LlmError::Config.is_retryable());
    }
}
