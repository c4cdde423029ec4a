//! Pipeline orchestrator: one inbound event in, one reply out.
//!
//! [`PipelineOrchestrator`] owns every stage and is shared across event
//! tasks behind an `Arc`.  It holds no mutable state of its own.
//!
//! # Event flow
//!
//! ```text
//! WebhookEvent
//!   └─▶ text_message()?              (else Skipped)
//!         └─▶ TranslationRequest      [Detected]
//!               └─▶ PromptBuilder     [Prompted]
//!                     └─▶ CompletionClient (retry + fallback)   [Completed]
//!                           └─▶ ResponseParser                 [Parsed]
//!                                 └─▶ PostProcessor            [PostProcessed]
//!                                       └─▶ ReplyAssembler     [Assembled]
//!                                             └─▶ ReplyClient  [Replied]
//! ```
//!
//! Any failure before assembly turns into the fixed failure message; the
//! user always gets a reply for a text event.  Reply delivery failures are
//! logged and dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::lang::{Direction, TranslationRequest};
use crate::llm::{CompletionBackend, CompletionClient, PromptBuilder, ResponseParser, RetryPolicy, TranslationResult};
use crate::postprocess::PostProcessor;
use crate::reply::{OutboundMessage, ReplyAssembler, ReplyClient};
use crate::server::models::WebhookEvent;

use super::state::{CompletionStatus, EventState, ParseStatus};

/// Characters of user text or model output shown in debug logs.
const LOG_PREVIEW_CHARS: usize = 80;

// ---------------------------------------------------------------------------
// EventOutcome
// ---------------------------------------------------------------------------

/// What happened to one event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    /// Last state reached.
    pub state: EventState,
    /// `None` when the event was skipped before detection.
    pub direction: Option<Direction>,
    /// Segments sent (or that would have been sent) as the reply.
    pub messages: Vec<OutboundMessage>,
}

impl EventOutcome {
    fn skipped() -> Self {
        Self {
            state: EventState::Skipped,
            direction: None,
            messages: Vec::new(),
        }
    }

    /// `true` when the reply carries the failure message instead of a
    /// translation.
    pub fn is_failure_reply(&self) -> bool {
        self.messages == [OutboundMessage::failure()]
    }
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Drives events through the translation pipeline.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use korthai::config::AppConfig;
/// use korthai::llm::ApiCompletionBackend;
/// use korthai::pipeline::PipelineOrchestrator;
/// use korthai::reply::MessagingApiClient;
///
/// # async fn example() {
/// let config = Arc::new(AppConfig::default());
/// let orchestrator = PipelineOrchestrator::new(
///     config.clone(),
///     Arc::new(ApiCompletionBackend::from_config(&config.llm)),
///     Arc::new(MessagingApiClient::from_config(&config.messaging)),
/// );
/// let outcome = orchestrator.translate("깨우야 밥 먹자").await;
/// println!("{:?}", outcome.messages);
/// # }
/// ```
pub struct PipelineOrchestrator {
    config: Arc<AppConfig>,
    prompt: PromptBuilder,
    completion: CompletionClient,
    parser: ResponseParser,
    post: PostProcessor,
    assembler: ReplyAssembler,
    replier: Arc<dyn ReplyClient>,
    next_event_id: AtomicU64,
}

impl PipelineOrchestrator {
    /// Build every stage from `config`.
    ///
    /// * `backend`: one completion attempt (e.g. `ApiCompletionBackend`).
    /// * `replier`: reply delivery (e.g. `MessagingApiClient`).
    pub fn new(
        config: Arc<AppConfig>,
        backend: Arc<dyn CompletionBackend>,
        replier: Arc<dyn ReplyClient>,
    ) -> Self {
        let style = &config.style;
        Self {
            prompt: PromptBuilder::new(style),
            completion: CompletionClient::new(backend, style, RetryPolicy::from_config(&config.llm)),
            parser: ResponseParser::new(style.schema_dialect),
            post: PostProcessor::new(style),
            assembler: ReplyAssembler::new(style),
            replier,
            next_event_id: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Deliveries
    // -----------------------------------------------------------------------

    /// Process every event of one delivery.
    ///
    /// Each event runs in its own task, so a panic or slow model call in one
    /// never affects the others.  Tasks are awaited in delivery order.
    pub async fn handle_delivery(self: &Arc<Self>, events: Vec<WebhookEvent>) -> Vec<EventOutcome> {
        let handles: Vec<_> = events
            .into_iter()
            .map(|event| {
                let orchestrator = Arc::clone(self);
                tokio::spawn(async move { orchestrator.handle_event(event).await })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => log::error!("pipeline: event task failed: {e}"),
            }
        }
        outcomes
    }

    /// Translate one event and deliver the reply.
    pub async fn handle_event(&self, event: WebhookEvent) -> EventOutcome {
        let id = self.next_event_id.fetch_add(1, Ordering::Relaxed);

        let Some((reply_token, text)) = event.text_message() else {
            log::debug!("pipeline: event #{id} ({}) is not a text message, skipping", event.kind);
            return EventOutcome::skipped();
        };

        let mut outcome = self.run(id, text).await;
        if outcome.state == EventState::Skipped {
            return outcome;
        }

        match self.replier.reply(reply_token, &outcome.messages).await {
            Ok(()) => self.advance(id, &mut outcome.state, EventState::Replied),
            Err(e) => log::warn!("pipeline: event #{id} reply delivery failed: {e}"),
        }
        outcome
    }

    /// Text in, reply segments out.  Nothing is delivered.
    pub async fn translate(&self, text: &str) -> EventOutcome {
        let id = self.next_event_id.fetch_add(1, Ordering::Relaxed);
        self.run(id, text).await
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    async fn run(&self, id: u64, text: &str) -> EventOutcome {
        let mut state = EventState::Received;

        let Some(request) = TranslationRequest::new(text) else {
            log::debug!("pipeline: event #{id} has blank text, skipping");
            return EventOutcome::skipped();
        };
        let direction = request.direction();
        self.advance(id, &mut state, EventState::Detected(direction));
        log::debug!(
            "pipeline: event #{id} source ({} chars): {}",
            request.source_text().chars().count(),
            preview(request.source_text())
        );

        let result = self.translate_request(id, &mut state, &request).await;

        let messages = self.assembler.assemble(direction, result.as_ref());
        self.advance(id, &mut state, EventState::Assembled);

        EventOutcome {
            state,
            direction: Some(direction),
            messages,
        }
    }

    /// Prompt → completion → parse → post-process.  `None` on any failure.
    async fn translate_request(
        &self,
        id: u64,
        state: &mut EventState,
        request: &TranslationRequest,
    ) -> Option<TranslationResult> {
        let chat = self.prompt.build_request(request, self.config.llm.temperature);
        self.advance(id, state, EventState::Prompted);

        let outcome = self.completion.complete(&chat).await;
        let raw = match outcome.raw_content {
            Some(raw) if outcome.success => {
                self.advance(id, state, EventState::Completed(CompletionStatus::Success));
                log::info!(
                    "pipeline: event #{id} completed by {} after {} attempt(s)",
                    outcome.model.as_deref().unwrap_or("?"),
                    outcome.attempts
                );
                raw
            }
            _ => {
                self.advance(id, state, EventState::Completed(CompletionStatus::Failure));
                log::warn!(
                    "pipeline: event #{id} completion failed (status {}, {} attempt(s)): {}",
                    outcome.http_status,
                    outcome.attempts,
                    outcome.failure_reason.as_deref().unwrap_or("unknown")
                );
                return None;
            }
        };

        let parsed = match self.parser.parse(&raw, request.direction()) {
            Ok(parsed) => {
                let status = if parsed.strategy.is_fallback() {
                    log::warn!("pipeline: event #{id} answer was not structured, used plain-line fallback");
                    ParseStatus::Fallback
                } else {
                    ParseStatus::Ok
                };
                self.advance(id, state, EventState::Parsed(status));
                parsed
            }
            Err(e) => {
                self.advance(id, state, EventState::Parsed(ParseStatus::Failed));
                log::warn!("pipeline: event #{id} could not parse answer: {e}");
                log::debug!("pipeline: event #{id} raw answer: {}", preview(&raw));
                return None;
            }
        };

        let processed = self.post.process(request, parsed.result);
        self.advance(id, state, EventState::PostProcessed);
        if processed.primary_text.is_empty() {
            log::warn!("pipeline: event #{id} translation was empty after post-processing");
        } else {
            log::debug!("pipeline: event #{id} translation: {}", preview(&processed.primary_text));
        }
        Some(processed)
    }

    fn advance(&self, id: u64, state: &mut EventState, next: EventState) {
        log::debug!("pipeline: event #{id} {state} → {next}");
        *state = next;
    }
}

/// First [`LOG_PREVIEW_CHARS`] characters, with an ellipsis when cut.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    if text.chars().count() > LOG_PREVIEW_CHARS {
        out.push('…');
    }
    out.replace('\n', " ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
