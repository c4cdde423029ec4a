//! Axum route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::config::NonPostPolicy;

use super::models::{HealthResponse, WebhookBody};
use super::ServerState;

/// `GET /health`
///
/// ```json
/// {"status": "ok", "version": "0.1.0"}
/// ```
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /webhook`: translate and answer every event in the delivery.
///
/// Always `200 OK`: the platform only needs an acknowledgement, and a
/// non-2xx answer would make it redeliver.  A body that is not a webhook
/// envelope is logged and acknowledged.
pub async fn webhook(State(state): State<Arc<ServerState>>, body: Bytes) -> StatusCode {
    let delivery: WebhookBody = match serde_json::from_slice(&body) {
        Ok(delivery) => delivery,
        Err(e) => {
            log::warn!("server: ignoring malformed webhook body ({} bytes): {e}", body.len());
            return StatusCode::OK;
        }
    };

    if delivery.events.is_empty() {
        log::debug!("server: webhook delivery without events");
        return StatusCode::OK;
    }

    log::info!("server: webhook delivery with {} event(s)", delivery.events.len());
    let outcomes = state.orchestrator.handle_delivery(delivery.events).await;
    log::debug!(
        "server: delivery finished: {}",
        outcomes
            .iter()
            .map(|o| o.state.label())
            .collect::<Vec<_>>()
            .join(", ")
    );

    StatusCode::OK
}

/// Any other method on the webhook path.
pub async fn webhook_other_method(State(state): State<Arc<ServerState>>, method: Method) -> StatusCode {
    log::debug!("server: {method} on webhook path");
    match state.non_post_policy {
        NonPostPolicy::Ok => StatusCode::OK,
        NonPostPolicy::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    }
}
