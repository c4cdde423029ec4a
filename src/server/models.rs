//! JSON models for the webhook and health endpoints.

use serde::{Deserialize, Serialize};

/// Body of a webhook delivery.  Unknown fields are ignored.
///
/// # Example
///
/// ```
/// use korthai::server::models::WebhookBody;
///
/// let json = r#"{"destination":"U1","events":[{"type":"message","replyToken":"t",
///                "message":{"type":"text","id":"1","text":"안녕"}}]}"#;
/// let body: WebhookBody = serde_json::from_str(json).unwrap();
/// assert_eq!(body.events[0].text_message(), Some(("t", "안녕")));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookBody {
    pub events: Vec<WebhookEvent>,
}

/// One event in a delivery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub reply_token: Option<String>,
    pub message: Option<EventMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

impl WebhookEvent {
    /// A text message event with a reply token.
    pub fn text(reply_token: &str, text: &str) -> Self {
        Self {
            kind: "message".into(),
            reply_token: Some(reply_token.into()),
            message: Some(EventMessage {
                kind: "text".into(),
                text: Some(text.into()),
            }),
        }
    }

    /// `(reply_token, text)` when this is a text message that can be
    /// answered; `None` for every other event.
    pub fn text_message(&self) -> Option<(&str, &str)> {
        if self.kind != "message" {
            return None;
        }
        let message = self.message.as_ref().filter(|m| m.kind == "text")?;
        let token = self.reply_token.as_deref().filter(|t| !t.is_empty())?;
        Some((token, message.text.as_deref()?))
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_text_events_have_no_text_message() {
        let sticker: WebhookEvent = serde_json::from_str(
            r#"{"type":"message","replyToken":"t","message":{"type":"sticker","packageId":"1"}}"#,
        )
        .unwrap();
        assert_eq!(sticker.text_message(), None);

        let follow: WebhookEvent = serde_json::from_str(r#"{"type":"follow","replyToken":"t"}"#).unwrap();
        assert_eq!(follow.text_message(), None);
    }

    #[test]
    fn missing_reply_token_is_not_answerable() {
        let event: WebhookEvent =
            serde_json::from_str(r#"{"type":"message","message":{"type":"text","text":"hi"}}"#).unwrap();
        assert_eq!(event.text_message(), None);
    }

    #[test]
    fn empty_body_has_no_events() {
        let body: WebhookBody = serde_json::from_str("{}").unwrap();
        assert!(body.events.is_empty());
    }

    #[test]
    fn constructor_round_trips_through_accessor() {
        let event = WebhookEvent::text("tok", "สวัสดี");
        assert_eq!(event.text_message(), Some(("tok", "สวัสดี")));
    }
}
