//! Reply delivery to the messaging platform.
//!
//! [`MessagingApiClient`] posts `{replyToken, messages}` to
//! `{api_base_url}/v2/bot/message/reply` with the channel access token as a
//! bearer token.  Failures are returned to the caller, which logs them; a
//! reply token is single-use, so nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::MessagingConfig;

use super::OutboundMessage;

// ---------------------------------------------------------------------------
// ReplyError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply request failed: {0}")]
    Request(String),

    #[error("reply request timed out")]
    Timeout,

    #[error("messaging API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Nothing to send, or no token to send it with.
    #[error("invalid reply: {0}")]
    Invalid(&'static str),
}

impl From<reqwest::Error> for ReplyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ReplyError::Timeout
        } else {
            ReplyError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ReplyClient trait
// ---------------------------------------------------------------------------

/// Sends the assembled segments back to the chat the event came from.
#[async_trait]
pub trait ReplyClient: Send + Sync {
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), ReplyError>;
}

// ---------------------------------------------------------------------------
// MessagingApiClient
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody<'a> {
    reply_token: &'a str,
    messages: &'a [OutboundMessage],
}

pub struct MessagingApiClient {
    client: reqwest::Client,
    config: MessagingConfig,
}

impl MessagingApiClient {
    pub fn from_config(config: &MessagingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v2/bot/message/reply",
            self.config.api_base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ReplyClient for MessagingApiClient {
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), ReplyError> {
        if reply_token.trim().is_empty() {
            return Err(ReplyError::Invalid("missing reply token"));
        }
        if messages.is_empty() {
            return Err(ReplyError::Invalid("no messages"));
        }

        let body = ReplyBody {
            reply_token,
            messages,
        };
        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(token) = self.config.access_token.as_deref().filter(|t| !t.is_empty()) {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        log::debug!("reply: delivered {} segment(s)", messages.len());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = MessagingApiClient::from_config(&MessagingConfig {
            api_base_url: "https://api.line.me/".into(),
            ..MessagingConfig::default()
        });
        assert_eq!(client.endpoint(), "https://api.line.me/v2/bot/message/reply");
    }

    #[test]
    fn body_uses_camel_case_reply_token() {
        let messages = [OutboundMessage::new("สวัสดีครับ"), OutboundMessage::new("(직역) 안녕하세요")];
        let body = ReplyBody {
            reply_token: "tok-1",
            messages: &messages,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "replyToken": "tok-1",
                "messages": [
                    { "type": "text", "text": "สวัสดีครับ" },
                    { "type": "text", "text": "(직역) 안녕하세요" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn blank_token_is_rejected_without_a_request() {
        let client = MessagingApiClient::from_config(&MessagingConfig::default());
        let err = client
            .reply("  ", &[OutboundMessage::new("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ReplyError::Invalid(_)));
    }

    #[tokio::test]
    async fn empty_message_list_is_rejected() {
        let client = MessagingApiClient::from_config(&MessagingConfig::default());
        let err = client.reply("tok", &[]).await.unwrap_err();
        assert!(matches!(err, ReplyError::Invalid(_)));
    }

    #[test]
    fn reply_client_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ReplyClient>();
    }
}
