//! Outbound side: turning a translation into reply segments and sending them.
//!
//! * [`ReplyAssembler`]: builds 1–2 [`OutboundMessage`]s from a result.
//! * [`ReplyClient`]: async trait for the messaging platform's reply call.
//! * [`MessagingApiClient`]: REST implementation (`/v2/bot/message/reply`).

pub mod assembler;
pub mod messaging;

/// Prefix of the second segment carrying the literal back-translation.
pub const LITERAL_PREFIX: &str = "(직역) ";

/// The only text a user ever sees when translation fails.
pub const FAILURE_MESSAGE: &str =
    "번역에 실패했어요. 잠시 후 다시 시도해 주세요. / แปลไม่สำเร็จ กรุณาลองใหม่อีกครั้งครับ";

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use assembler::{OutboundMessage, ReplyAssembler};
pub use messaging::{MessagingApiClient, ReplyClient, ReplyError};
