//! Completion-API side of the translation pipeline.
//!
//! This module provides:
//! * [`CompletionBackend`]: async trait for one attempt against one model.
//! * [`ApiCompletionBackend`]: OpenAI-compatible REST implementation.
//! * [`CompletionClient`]: rate-limit retry + model fallback loop that
//!   always yields a [`CompletionOutcome`].
//! * [`PromptBuilder`]: system/user messages for a translation request.
//! * [`ResponseParser`]: layered parsing into a [`TranslationResult`].
//! * [`LlmError`]: error variants for a single attempt.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use korthai::config::AppConfig;
//! use korthai::lang::TranslationRequest;
//! use korthai::llm::{ApiCompletionBackend, CompletionClient, PromptBuilder, ResponseParser, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let backend = Arc::new(ApiCompletionBackend::from_config(&config.llm));
//!     let client = CompletionClient::new(backend, &config.style, RetryPolicy::from_config(&config.llm));
//!
//!     let request = TranslationRequest::new("밥 먹었어?").unwrap();
//!     let chat = PromptBuilder::new(&config.style).build_request(&request, config.llm.temperature);
//!     let outcome = client.complete(&chat).await;
//!
//!     if let Some(raw) = outcome.raw_content {
//!         let parsed = ResponseParser::new(config.style.schema_dialect).parse(&raw, request.direction());
//!         println!("{:?}", parsed);
//!     }
//! }
//! ```

pub mod client;
pub mod fallback;
pub mod parser;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiCompletionBackend, ChatMessage, ChatRequest, CompletionBackend, LlmError};
pub use fallback::{CompletionClient, CompletionOutcome, RetryPolicy};
pub use parser::{ParseError, ParseStrategy, ParsedResponse, ResponseParser, TranslationResult};
pub use prompt::PromptBuilder;
