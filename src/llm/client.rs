//! Core `CompletionBackend` trait and `ApiCompletionBackend` implementation.
//!
//! `ApiCompletionBackend` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint (OpenAI, Groq, Ollama in OpenAI mode, vLLM, ...).  It performs
//! exactly one attempt against one model; retries and model fallback live in
//! [`CompletionClient`](crate::llm::CompletionClient).

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors from a single completion attempt.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("completion request timed out")]
    Timeout,

    /// The provider answered 429.
    #[error("rate limited by provider")]
    RateLimited,

    /// Any other non-2xx answer.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be parsed as the expected envelope.
    #[error("failed to parse completion response: {0}")]
    Parse(String),

    /// The provider answered, but with no usable text.
    #[error("completion returned no content")]
    EmptyResponse,
}

impl LlmError {
    /// HTTP status associated with the failure; `0` when no response was
    /// received at all.
    pub fn http_status(&self) -> u16 {
        match self {
            LlmError::Request(_) | LlmError::Timeout => 0,
            LlmError::RateLimited => 429,
            LlmError::Status { status, .. } => *status,
            LlmError::Parse(_) | LlmError::EmptyResponse => 200,
        }
    }

    /// Only rate limiting is retried on the same model.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited)
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Chat payload
// ---------------------------------------------------------------------------

/// One role-tagged prompt message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Model-independent part of a completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// Send `response_format: {"type": "json_object"}`.
    pub json_mode: bool,
}

// ---------------------------------------------------------------------------
// CompletionBackend trait
// ---------------------------------------------------------------------------

/// One completion attempt against one model.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (`Arc<dyn CompletionBackend>`).  Returns the trimmed completion text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, model: &str, request: &ChatRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiCompletionBackend
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// All connection details (`base_url`, `api_key`, timeout) come from the
/// [`LlmConfig`] passed to [`ApiCompletionBackend::from_config`].
pub struct ApiCompletionBackend {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiCompletionBackend {
    /// Build a backend from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is used as a last resort if
    /// the builder fails (TLS backend initialisation errors).
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Build the wire body for one attempt.
fn request_body(model: &str, request: &ChatRequest) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model":       model,
        "messages":    request.messages,
        "temperature": request.temperature,
        "stream":      false
    });
    if request.json_mode {
        body["response_format"] = serde_json::json!({ "type": "json_object" });
    }
    body
}

/// Pull `choices[0].message.content` out of the provider envelope.
fn extract_content(json: &serde_json::Value) -> Result<String, LlmError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?
        .trim()
        .to_string();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(content)
}

#[async_trait]
impl CompletionBackend for ApiCompletionBackend {
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string, so keyless local providers
    /// keep working.
    async fn complete(&self, model: &str, request: &ChatRequest) -> Result<String, LlmError> {
        let body = request_body(model, request);

        let mut req = self.client.post(self.endpoint()).json(&body);
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        extract_content(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
