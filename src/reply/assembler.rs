//! Reply assembly: one translation becomes one or two chat bubbles.
//!
//! ```text
//! segment 1: primary text                  (always)
//! segment 2: "(직역) " + literal            (KR→TH, when enabled and present)
//! ```
//!
//! Each segment is capped at `max_segment_length` characters.  An empty or
//! missing primary text yields exactly one segment with [`FAILURE_MESSAGE`].

use serde::{Deserialize, Serialize};

use crate::config::StyleConfig;
use crate::lang::Direction;
use crate::llm::TranslationResult;

use super::{FAILURE_MESSAGE, LITERAL_PREFIX};

/// One text bubble, serialised as `{"type":"text","text":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "text")]
pub struct OutboundMessage {
    pub text: String,
}

impl OutboundMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The fixed user-facing failure bubble.
    pub fn failure() -> Self {
        Self::new(FAILURE_MESSAGE)
    }
}

#[derive(Debug, Clone)]
pub struct ReplyAssembler {
    include_back_translation: bool,
    max_segment_length: usize,
}

impl ReplyAssembler {
    pub fn new(style: &StyleConfig) -> Self {
        Self {
            include_back_translation: style.include_back_translation,
            max_segment_length: style.max_segment_length.max(1),
        }
    }

    /// Build the reply for a processed result; `None` means the pipeline
    /// failed before producing one.
    pub fn assemble(&self, direction: Direction, result: Option<&TranslationResult>) -> Vec<OutboundMessage> {
        let Some(result) = result else {
            return vec![OutboundMessage::failure()];
        };

        let primary = result.primary_text.trim();
        if primary.is_empty() {
            return vec![OutboundMessage::failure()];
        }

        let mut segments = vec![OutboundMessage::new(self.truncate(primary))];

        if self.include_back_translation && direction == Direction::KrToTh {
            let literal = result
                .literal_back_translation
                .as_deref()
                .map(str::trim)
                .filter(|literal| !literal.is_empty());
            if let Some(literal) = literal {
                segments.push(OutboundMessage::new(
                    self.truncate(&format!("{LITERAL_PREFIX}{literal}")),
                ));
            }
        }

        segments
    }

    /// Cut to `max_segment_length` Unicode scalar values.
    fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.max_segment_length) {
            Some((byte_idx, _)) => text[..byte_idx].to_string(),
            None => text.to_string(),
        }
    }
}
