//! Prompt builder for Korean ↔ Thai chat translation.
//!
//! [`PromptBuilder`] produces a `(system_msg, user_msg)` pair for any
//! OpenAI-compatible `/v1/chat/completions` endpoint:
//!
//! * `system_msg`: the fixed translation policy plus the answer-shape
//!   section for the configured [`OutputFormat`] / [`SchemaDialect`].
//! * `user_msg`: the direction tag and the source text.
//!
//! The policy block is direction-agnostic; the direction travels in the user
//! message so the system prompt stays identical across requests.

use crate::config::{OutputFormat, SchemaDialect, StyleConfig};
use crate::lang::TranslationRequest;
use crate::llm::client::{ChatMessage, ChatRequest};
use crate::reply::LITERAL_PREFIX;

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION: &str = "\
You are a translation engine relaying a private chat between a Korean speaker and a Thai speaker.
You are NOT a chat assistant.

Absolute rules:
1. Output ONLY the translation. No greetings, no commentary, no explanations, no notes.
2. Never answer or react to the message; translate it, questions included.
3. Keep the speaker's tone, emoji and punctuation.

KR2TH (Korean -> Thai):
- Write Thai script only. Never leave Hangul in the Thai text.
- The speaker is a man: use a natural polite male register (ครับ where a Thai man would say it).
- The name \"깨우\" is always written \"แก้ว\".

TH2KR (Thai -> Korean):
- Write natural Korean in a friendly polite ~요/~해요 style.
- Exactly one line. Never leave Thai script in the Korean text.
- The name \"แก้ว\" is always written \"깨우\".

Laughter:
- ㅋㅋ, ㅎㅎ and 하하 mean the same as Thai 555 and ฮ่าๆ.
- In Thai output write 555. In Korean output write ㅋㅋㅋ.
";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds translation prompts for the configured answer shape.
///
/// # Example
/// ```rust
/// use korthai::config::StyleConfig;
/// use korthai::lang::TranslationRequest;
/// use korthai::llm::PromptBuilder;
///
/// let builder = PromptBuilder::new(&StyleConfig::default());
/// let request = TranslationRequest::new("밥 먹었어?").unwrap();
/// let (system, user) = builder.build_chat(&request);
/// assert!(system.contains("translation engine"));
/// assert!(user.contains("KR2TH"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    output_format: OutputFormat,
    dialect: SchemaDialect,
    include_back_translation: bool,
}

impl PromptBuilder {
    pub fn new(style: &StyleConfig) -> Self {
        Self {
            output_format: style.output_format,
            dialect: style.schema_dialect,
            include_back_translation: style.include_back_translation,
        }
    }

    /// Build a **(system_msg, user_msg)** pair.
    pub fn build_chat(&self, request: &TranslationRequest) -> (String, String) {
        let mut system_msg = String::with_capacity(2048);
        system_msg.push_str(SYSTEM_INSTRUCTION);
        system_msg.push('\n');
        system_msg.push_str(&self.output_shape());

        let user_msg = format!(
            "Direction: {}\nSource text:\n{}",
            request.direction().tag(),
            request.source_text()
        );

        (system_msg, user_msg)
    }

    /// Build the full chat request payload (model is chosen per attempt).
    pub fn build_request(&self, request: &TranslationRequest, temperature: f32) -> ChatRequest {
        let (system_msg, user_msg) = self.build_chat(request);
        ChatRequest {
            messages: vec![ChatMessage::system(system_msg), ChatMessage::user(user_msg)],
            temperature,
            json_mode: self.wants_json_hint(),
        }
    }

    /// Whether the API should receive a `response_format` JSON hint.
    pub fn wants_json_hint(&self) -> bool {
        self.output_format == OutputFormat::Json
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn output_shape(&self) -> String {
        match self.output_format {
            OutputFormat::Json => self.json_shape(),
            OutputFormat::PlainLines => self.plain_shape(),
        }
    }

    fn json_shape(&self) -> String {
        let (kr_to_th, th_to_kr) = match (self.dialect, self.include_back_translation) {
            (SchemaDialect::ModeFields, true) => (
                r#"{"mode":"KR2TH","th":"<Thai translation>","ko_backliteral":"<literal Korean rendering of the Thai>"}"#,
                r#"{"mode":"TH2KR","ko":"<Korean translation>"}"#,
            ),
            (SchemaDialect::ModeFields, false) => (
                r#"{"mode":"KR2TH","th":"<Thai translation>"}"#,
                r#"{"mode":"TH2KR","ko":"<Korean translation>"}"#,
            ),
            (SchemaDialect::PrimaryPreview, true) => (
                r#"{"primary":"<Thai translation>","preview":"<literal Korean rendering of the Thai>"}"#,
                r#"{"primary":"<Korean translation>"}"#,
            ),
            (SchemaDialect::PrimaryPreview, false) => (
                r#"{"primary":"<Thai translation>"}"#,
                r#"{"primary":"<Korean translation>"}"#,
            ),
            (SchemaDialect::TranslatedLiteral, true) => (
                r#"{"translated":"<Thai translation>","literal":"<literal Korean rendering of the Thai>"}"#,
                r#"{"translated":"<Korean translation>"}"#,
            ),
            (SchemaDialect::TranslatedLiteral, false) => (
                r#"{"translated":"<Thai translation>"}"#,
                r#"{"translated":"<Korean translation>"}"#,
            ),
        };

        format!(
            "Answer format:\nReply with exactly one JSON object and nothing else (no code fences).\n\
             KR2TH: {kr_to_th}\nTH2KR: {th_to_kr}\n"
        )
    }

    fn plain_shape(&self) -> String {
        let mut shape = String::from(
            "Answer format:\nReply with plain text only, no quotes, no labels.\n\
             Line 1: the translation.\n",
        );
        if self.include_back_translation {
            shape.push_str(&format!(
                "Line 2 (KR2TH only): \"{}\" followed by a literal Korean rendering of line 1.\n",
                LITERAL_PREFIX.trim_end()
            ));
        }
        shape.push_str("TH2KR answers are exactly one line.\n");
        shape
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
