//! Integration tests for the webhook server.
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`;
//! the completion API and the reply API are replaced by test doubles.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt; // for oneshot()

use korthai::config::{AppConfig, NonPostPolicy};
use korthai::lang::is_hangul;
use korthai::llm::{ChatRequest, CompletionBackend, LlmError};
use korthai::pipeline::PipelineOrchestrator;
use korthai::reply::{OutboundMessage, ReplyClient, ReplyError, FAILURE_MESSAGE};
use korthai::server::models::HealthResponse;
use korthai::server::{build_app_with_state, ServerState};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

enum Answer {
    Text(&'static str),
    RateLimited,
    ServerError,
}

/// Replays answers in order; records the model of every call.
struct ScriptedBackend {
    answers: Mutex<VecDeque<Answer>>,
    models: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(answers: Vec<Answer>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            models: Mutex::new(Vec::new()),
        })
    }

    fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, model: &str, _request: &ChatRequest) -> Result<String, LlmError> {
        self.models.lock().unwrap().push(model.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(Answer::Text(text)) => Ok(text.to_string()),
            Some(Answer::RateLimited) => Err(LlmError::RateLimited),
            Some(Answer::ServerError) | None => Err(LlmError::Status {
                status: 503,
                body: "unavailable".into(),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingReplier {
    sent: Mutex<Vec<(String, Vec<OutboundMessage>)>>,
}

impl RecordingReplier {
    fn sent(&self) -> Vec<(String, Vec<OutboundMessage>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyClient for RecordingReplier {
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), ReplyError> {
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), messages.to_vec()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.llm.initial_backoff_ms = 5;
    config.llm.timeout_secs = 2;
    config
}

fn build(config: AppConfig, backend: Arc<ScriptedBackend>, replier: Arc<RecordingReplier>) -> Router {
    let orchestrator = Arc::new(PipelineOrchestrator::new(Arc::new(config), backend, replier));
    build_app_with_state(ServerState::new(orchestrator))
}

fn text_delivery(reply_token: &str, text: &str) -> String {
    serde_json::json!({
        "destination": "U0",
        "events": [{
            "type": "message",
            "replyToken": reply_token,
            "source": { "type": "user", "userId": "U1" },
            "message": { "type": "text", "id": "1", "text": text }
        }]
    })
    .to_string()
}

async fn post_webhook(app: Router, body: impl Into<Body>) -> StatusCode {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

// ---------------------------------------------------------------------------
// Translation scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn korean_message_gets_thai_reply_and_literal() {
    let backend = ScriptedBackend::new(vec![Answer::Text(
        r#"{"mode":"KR2TH","th":"แก้ว ㅋㅋㅋ กินข้าวกัน","ko_backliteral":"깨우 ㅋㅋㅋ 밥 먹자"}"#,
    )]);
    let replier = Arc::new(RecordingReplier::default());
    let app = build(test_config(), backend, replier.clone());

    let status = post_webhook(app, text_delivery("tok-kr", "깨우야 ㅋㅋㅋ 밥 먹자")).await;
    assert_eq!(status, StatusCode::OK);

    let sent = replier.sent();
    assert_eq!(sent.len(), 1);
    let (token, messages) = &sent[0];
    assert_eq!(token, "tok-kr");
    assert_eq!(messages.len(), 2);

    let thai = &messages[0].text;
    assert!(thai.contains("แก้ว"), "{thai}");
    assert!(thai.contains("555"), "{thai}");
    assert!(!thai.chars().any(is_hangul), "{thai}");
    assert!(messages[1].text.starts_with("(직역) "));
}

#[tokio::test]
async fn thai_message_gets_single_korean_reply() {
    let backend = ScriptedBackend::new(vec![Answer::Text(r#"{"mode":"TH2KR","ko":"밥 먹었어요? 555"}"#)]);
    let replier = Arc::new(RecordingReplier::default());
    let app = build(test_config(), backend, replier.clone());

    let status = post_webhook(app, text_delivery("tok-th", "กินข้าวหรือยังครับ 555")).await;
    assert_eq!(status, StatusCode::OK);

    let sent = replier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, vec![OutboundMessage::new("밥 먹었어요? ㅋㅋㅋ")]);
}

#[tokio::test]
async fn rate_limited_twice_then_succeeds_on_primary_model() {
    let backend = ScriptedBackend::new(vec![
        Answer::RateLimited,
        Answer::RateLimited,
        Answer::Text(r#"{"ko":"고마워요"}"#),
    ]);
    let replier = Arc::new(RecordingReplier::default());
    let config = test_config();
    let primary = config.style.target_model.clone();
    let app = build(config, backend.clone(), replier.clone());

    let status = post_webhook(app, text_delivery("tok", "ขอบคุณครับ")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(backend.models(), vec![primary.clone(), primary.clone(), primary]);
    assert_eq!(replier.sent()[0].1, vec![OutboundMessage::new("고마워요")]);
}

#[tokio::test]
async fn both_models_failing_sends_failure_message() {
    let backend = ScriptedBackend::new(vec![Answer::ServerError, Answer::ServerError]);
    let replier = Arc::new(RecordingReplier::default());
    let config = test_config();
    let expected_models = vec![config.style.target_model.clone(), config.style.fallback_model.clone()];
    let app = build(config, backend.clone(), replier.clone());

    let status = post_webhook(app, text_delivery("tok", "안녕하세요")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(backend.models(), expected_models);
    let sent = replier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, vec![OutboundMessage::new(FAILURE_MESSAGE)]);
}

#[tokio::test]
async fn multiple_events_are_answered_independently() {
    let backend = ScriptedBackend::new(vec![
        Answer::Text(r#"{"ko":"네"}"#),
        Answer::Text(r#"{"ko":"네"}"#),
    ]);
    let replier = Arc::new(RecordingReplier::default());
    let app = build(test_config(), backend, replier.clone());

    let body = serde_json::json!({
        "events": [
            { "type": "message", "replyToken": "a", "message": { "type": "text", "text": "ใช่" } },
            { "type": "message", "replyToken": "s", "message": { "type": "sticker", "stickerId": "1" } },
            { "type": "message", "replyToken": "b", "message": { "type": "text", "text": "ครับ" } }
        ]
    })
    .to_string();
    assert_eq!(post_webhook(app, body).await, StatusCode::OK);

    let mut tokens: Vec<_> = replier.sent().into_iter().map(|(token, _)| token).collect();
    tokens.sort();
    assert_eq!(tokens, vec!["a".to_string(), "b".to_string()]);
}

// ---------------------------------------------------------------------------
// Non-translation requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_text_event_is_skipped_without_reply() {
    let backend = ScriptedBackend::new(vec![]);
    let replier = Arc::new(RecordingReplier::default());
    let app = build(test_config(), backend.clone(), replier.clone());

    let body = r#"{"events":[{"type":"follow","replyToken":"tok"}]}"#;
    assert_eq!(post_webhook(app, body).await, StatusCode::OK);

    assert!(replier.sent().is_empty());
    assert!(backend.models().is_empty());
}

#[tokio::test]
async fn malformed_body_is_acknowledged() {
    let backend = ScriptedBackend::new(vec![]);
    let replier = Arc::new(RecordingReplier::default());
    let app = build(test_config(), backend, replier.clone());

    assert_eq!(post_webhook(app, "{not json").await, StatusCode::OK);
    assert!(replier.sent().is_empty());
}

#[tokio::test]
async fn get_on_webhook_follows_policy() {
    for (policy, expected) in [
        (NonPostPolicy::Ok, StatusCode::OK),
        (NonPostPolicy::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
    ] {
        let mut config = test_config();
        config.server.non_post_status = policy;
        let app = build(config, ScriptedBackend::new(vec![]), Arc::new(RecordingReplier::default()));

        let response = app
            .oneshot(Request::builder().uri("/webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "policy {policy:?}");
    }
}

#[tokio::test]
async fn custom_webhook_path_is_routed() {
    let mut config = test_config();
    config.server.webhook_path = "/callback".into();
    assert_custom_path_answers(config).await;
}

#[tokio::test]
async fn webhook_path_without_leading_slash_is_normalised() {
    let mut config = test_config();
    config.server.webhook_path = "callback".into();
    config.llm.api_key = Some("sk-test".into());
    config.messaging.access_token = Some("token".into());
    config.validate().unwrap();
    assert_custom_path_answers(config).await;
}

async fn assert_custom_path_answers(config: AppConfig) {
    let backend = ScriptedBackend::new(vec![Answer::Text(r#"{"ko":"좋아요"}"#)]);
    let replier = Arc::new(RecordingReplier::default());
    let app = build(config, backend, replier.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/callback")
                .header("content-type", "application/json")
                .body(Body::from(text_delivery("tok", "ดีครับ")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(replier.sent().len(), 1);
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let app = build(
        test_config(),
        ScriptedBackend::new(vec![]),
        Arc::new(RecordingReplier::default()),
    );

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}
