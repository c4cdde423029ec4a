//! HTTP surface of the relay.
//!
//! ## Endpoints
//!
//! - `POST /webhook`: messaging platform webhook (path configurable via
//!   `server.webhook_path`)
//! - any other method on the webhook path: `200` or `405` per
//!   `server.non_post_status`
//! - `GET /health`: health check

pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::NonPostPolicy;
use crate::pipeline::PipelineOrchestrator;

/// State shared by all handlers.
pub struct ServerState {
    pub orchestrator: Arc<PipelineOrchestrator>,
    pub non_post_policy: NonPostPolicy,
}

impl ServerState {
    /// Take the non-POST policy from the orchestrator's config.
    pub fn new(orchestrator: Arc<PipelineOrchestrator>) -> Arc<Self> {
        let non_post_policy = orchestrator.config().server.non_post_status;
        Arc::new(Self {
            orchestrator,
            non_post_policy,
        })
    }
}

/// Build the Axum router around a ready orchestrator.
///
/// ```no_run
/// use std::sync::Arc;
/// use korthai::config::AppConfig;
/// use korthai::llm::ApiCompletionBackend;
/// use korthai::pipeline::PipelineOrchestrator;
/// use korthai::reply::MessagingApiClient;
/// use korthai::server::{build_app_with_state, ServerState};
///
/// #[tokio::main]
/// async fn main() {
///     let config = Arc::new(AppConfig::default());
///     let orchestrator = Arc::new(PipelineOrchestrator::new(
///         config.clone(),
///         Arc::new(ApiCompletionBackend::from_config(&config.llm)),
///         Arc::new(MessagingApiClient::from_config(&config.messaging)),
///     ));
///     let app = build_app_with_state(ServerState::new(orchestrator));
///     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
///     axum::serve(listener, app).await.unwrap();
/// }
/// ```
pub fn build_app_with_state(state: Arc<ServerState>) -> Router {
    let webhook_path = normalise_path(&state.orchestrator.config().server.webhook_path);

    Router::new()
        .route("/health", get(routes::health))
        .route(
            &webhook_path,
            post(routes::webhook).fallback(routes::webhook_other_method),
        )
        .with_state(state)
}

/// Route paths must start with `/`.
fn normalise_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        "/webhook".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
