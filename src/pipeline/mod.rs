//! Event pipeline for the translation relay.
//!
//! This module wires detect → prompt → complete → parse → post-process →
//! assemble → reply for every webhook event, and defines the per-event
//! state labels used in logs.
//!
//! # Architecture
//!
//! ```text
//! POST /webhook (axum handler)
//!        │
//!        ▼
//! PipelineOrchestrator::handle_delivery()
//!        │
//!        ├─ tokio::spawn(handle_event(e1)) ─┐
//!        ├─ tokio::spawn(handle_event(e2)) ─┤  independent tasks,
//!        └─ ...                             ┘  awaited in order
//!
//! AppConfig (Arc, immutable) ←─── read by every stage
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use korthai::config::AppConfig;
//! use korthai::llm::ApiCompletionBackend;
//! use korthai::pipeline::PipelineOrchestrator;
//! use korthai::reply::MessagingApiClient;
//! use korthai::server::models::WebhookEvent;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Arc::new(AppConfig::default());
//!     let orchestrator = Arc::new(PipelineOrchestrator::new(
//!         config.clone(),
//!         Arc::new(ApiCompletionBackend::from_config(&config.llm)),
//!         Arc::new(MessagingApiClient::from_config(&config.messaging)),
//!     ));
//!
//!     let outcomes = orchestrator
//!         .handle_delivery(vec![WebhookEvent::text("reply-token", "밥 먹었어?")])
//!         .await;
//!     println!("{:?}", outcomes);
//! }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{EventOutcome, PipelineOrchestrator};
pub use state::{CompletionStatus, EventState, ParseStatus};
