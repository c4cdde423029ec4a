//! Retry and model-fallback loop around any [`CompletionBackend`].
//!
//! [`CompletionClient`] walks an explicit, ordered attempt list
//! (`[target_model, fallback_model]`):
//!
//! ```text
//! for model in attempt list:
//!     attempt ──Ok(text)──────────────▶ success outcome
//!        │
//!        ├─ 429 and retries left ──▶ sleep(backoff), backoff *= 2, same model
//!        └─ anything else ─────────▶ next model
//! list exhausted ────────────────────▶ failure outcome
//! ```
//!
//! It never returns an error: the caller always receives a
//! [`CompletionOutcome`] and decides what the user sees.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{LlmConfig, StyleConfig};
use crate::llm::client::{ChatRequest, CompletionBackend, LlmError};

// ---------------------------------------------------------------------------
// CompletionOutcome
// ---------------------------------------------------------------------------

/// Result of the whole attempt list.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub success: bool,
    /// Status of the last response; `0` when no response arrived.
    pub http_status: u16,
    pub raw_content: Option<String>,
    pub failure_reason: Option<String>,
    /// Model that produced `raw_content`.
    pub model: Option<String>,
    /// Total attempts made, retries included.
    pub attempts: u32,
}

impl CompletionOutcome {
    fn succeeded(model: &str, content: String, attempts: u32) -> Self {
        Self {
            success: true,
            http_status: 200,
            raw_content: Some(content),
            failure_reason: None,
            model: Some(model.to_string()),
            attempts,
        }
    }

    fn failed(last_error: Option<LlmError>, attempts: u32) -> Self {
        let (http_status, reason) = match last_error {
            Some(err) => (err.http_status(), err.to_string()),
            None => (0, "no model configured".to_string()),
        };
        Self {
            success: false,
            http_status,
            raw_content: None,
            failure_reason: Some(reason),
            model: None,
            attempts,
        }
    }
}

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Rate-limit retry and timeout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts on the same model after a 429.
    pub max_rate_limit_retries: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub initial_backoff: Duration,
    /// Upper bound on a single attempt, whatever the backend does.
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            max_rate_limit_retries: config.max_rate_limit_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            attempt_timeout: Duration::from_secs(config.timeout_secs.max(1)),
        }
    }

    /// Delay before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.initial_backoff.saturating_mul(1u32 << retry.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default())
    }
}

// ---------------------------------------------------------------------------
// CompletionClient
// ---------------------------------------------------------------------------

/// Drives one request through the attempt list.
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
    models: Vec<String>,
    policy: RetryPolicy,
}

impl CompletionClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, style: &StyleConfig, policy: RetryPolicy) -> Self {
        Self {
            backend,
            models: attempt_list(style),
            policy,
        }
    }

    /// Models in the order they will be tried.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Run the attempt list.  Never fails; see [`CompletionOutcome`].
    pub async fn complete(&self, request: &ChatRequest) -> CompletionOutcome {
        let mut attempts = 0u32;
        let mut last_error = None;

        for (hop, model) in self.models.iter().enumerate() {
            if hop > 0 {
                log::info!("llm: falling back to model {model}");
            }

            let mut retry = 0u32;
            loop {
                attempts += 1;
                match self.attempt(model, request).await {
                    Ok(content) => return CompletionOutcome::succeeded(model, content, attempts),
                    Err(err) if err.is_rate_limited() && retry < self.policy.max_rate_limit_retries => {
                        let delay = self.policy.backoff(retry);
                        log::warn!(
                            "llm: {model} rate limited, retry {}/{} in {}ms",
                            retry + 1,
                            self.policy.max_rate_limit_retries,
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                        retry += 1;
                    }
                    Err(err) => {
                        log::warn!("llm: {model} failed: {err}");
                        last_error = Some(err);
                        break;
                    }
                }
            }
        }

        CompletionOutcome::failed(last_error, attempts)
    }

    async fn attempt(&self, model: &str, request: &ChatRequest) -> Result<String, LlmError> {
        let content = tokio::time::timeout(
            self.policy.attempt_timeout,
            self.backend.complete(model, request),
        )
        .await
        .map_err(|_| LlmError::Timeout)??;

        let content = content.trim();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content.to_string())
    }
}

/// `[target, fallback]`, with the fallback dropped when blank or identical.
fn attempt_list(style: &StyleConfig) -> Vec<String> {
    let mut models = Vec::with_capacity(2);
    let target = style.target_model.trim();
    let fallback = style.fallback_model.trim();
    if !target.is_empty() {
        models.push(target.to_string());
    }
    if !fallback.is_empty() && fallback != target {
        models.push(fallback.to_string());
    }
    models
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
