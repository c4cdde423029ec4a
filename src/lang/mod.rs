//! Language detection for the Korean ↔ Thai relay.
//!
//! * [`detect_direction`]: picks [`Direction::KrToTh`] or
//!   [`Direction::ThToKr`] from the scripts present in the input.
//! * [`TranslationRequest`]: trimmed source text plus its direction.
//! * [`is_hangul`] / [`is_thai`]: range predicates shared with
//!   post-processing.

pub mod detect;

pub use detect::{
    detect_direction, is_hangul, is_hangul_syllable, is_thai, Direction, TranslationRequest,
};
