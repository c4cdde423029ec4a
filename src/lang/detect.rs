//! Script-based direction detection and Unicode range predicates.
//!
//! Detection looks only at which script appears in the input:
//!
//! 1. Any Hangul syllable (U+AC00 – U+D7A3) → [`Direction::KrToTh`].
//! 2. Otherwise any Thai character (U+0E01 – U+0E5B) → [`Direction::ThToKr`].
//! 3. Otherwise (Latin, digits, emoji) → [`Direction::KrToTh`]; most of the
//!    traffic is written in Korean.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Unicode ranges
// ---------------------------------------------------------------------------

/// First and last precomposed Hangul syllables.
const HANGUL_SYLLABLES: (char, char) = ('\u{AC00}', '\u{D7A3}');

/// Conjoining jamo block.
const HANGUL_JAMO: (char, char) = ('\u{1100}', '\u{11FF}');

/// Compatibility jamo block (ㄱ … ㅣ, including ㅋ and ㅎ).
const HANGUL_COMPAT_JAMO: (char, char) = ('\u{3130}', '\u{318F}');

/// U+0E00 is unassigned; the first real Thai character (ก) is U+0E01 and
/// U+0E5B (๛) is the last assigned codepoint in the core block.
const THAI: (char, char) = ('\u{0E01}', '\u{0E5B}');

#[inline]
fn within(c: char, (start, end): (char, char)) -> bool {
    (start..=end).contains(&c)
}

/// `true` for precomposed Hangul syllables only.
#[inline]
pub fn is_hangul_syllable(c: char) -> bool {
    within(c, HANGUL_SYLLABLES)
}

/// `true` for any Hangul codepoint: syllables, conjoining or compatibility
/// jamo.
#[inline]
pub fn is_hangul(c: char) -> bool {
    within(c, HANGUL_SYLLABLES) || within(c, HANGUL_JAMO) || within(c, HANGUL_COMPAT_JAMO)
}

/// `true` for characters of the core Thai block.
#[inline]
pub fn is_thai(c: char) -> bool {
    within(c, THAI)
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// The two supported translation directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Korean source, Thai output.
    #[serde(rename = "KR_TO_TH")]
    KrToTh,
    /// Thai source, Korean output.
    #[serde(rename = "TH_TO_KR")]
    ThToKr,
}

impl Direction {
    /// Tag embedded in prompts and the `mode` JSON field.
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::KrToTh => "KR2TH",
            Direction::ThToKr => "TH2KR",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::KrToTh => write!(f, "KR_TO_TH"),
            Direction::ThToKr => write!(f, "TH_TO_KR"),
        }
    }
}

/// Classify `text` by script.  Total: every input yields a direction.
///
/// ```
/// use korthai::lang::{detect_direction, Direction};
///
/// assert_eq!(detect_direction("밥 먹었어?"), Direction::KrToTh);
/// assert_eq!(detect_direction("กินข้าวยัง"), Direction::ThToKr);
/// assert_eq!(detect_direction("ok 👍"), Direction::KrToTh);
/// ```
pub fn detect_direction(text: &str) -> Direction {
    if text.chars().any(is_hangul_syllable) {
        Direction::KrToTh
    } else if text.chars().any(is_thai) {
        Direction::ThToKr
    } else {
        Direction::KrToTh
    }
}

// ---------------------------------------------------------------------------
// TranslationRequest
// ---------------------------------------------------------------------------

/// One unit of work: trimmed source text plus its detected direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    source_text: String,
    direction: Direction,
}

impl TranslationRequest {
    /// Trim `text` and detect its direction.  Returns `None` when nothing
    /// but whitespace remains.
    pub fn new(text: &str) -> Option<Self> {
        let source_text = text.trim();
        if source_text.is_empty() {
            return None;
        }
        Some(Self {
            direction: detect_direction(source_text),
            source_text: source_text.to_string(),
        })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_sentence_is_kr_to_th() {
        assert_eq!(detect_direction("오늘 저녁에 뭐 먹을래?"), Direction::KrToTh);
    }

    #[test]
    fn thai_sentence_is_th_to_kr() {
        assert_eq!(detect_direction("กินข้าวหรือยังครับ"), Direction::ThToKr);
    }

    #[test]
    fn hangul_wins_over_thai_in_mixed_text() {
        assert_eq!(detect_direction("แก้ว 깨우 555"), Direction::KrToTh);
    }

    #[test]
    fn jamo_only_laughter_is_not_a_syllable() {
        // "ㅋㅋㅋ" carries no syllable and no Thai: falls back to Korean source.
        assert_eq!(detect_direction("ㅋㅋㅋ"), Direction::KrToTh);
        assert_eq!(detect_direction("555 ฮ่าๆ ㅋㅋ"), Direction::ThToKr);
    }

    #[test]
    fn latin_emoji_and_empty_default_to_korean_source() {
        assert_eq!(detect_direction("hello"), Direction::KrToTh);
        assert_eq!(detect_direction("🙂🙂"), Direction::KrToTh);
        assert_eq!(detect_direction(""), Direction::KrToTh);
    }

    #[test]
    fn predicates_cover_expected_ranges() {
        assert!(is_hangul('가'));
        assert!(is_hangul('ㅋ'));
        assert!(is_hangul('\u{1100}'));
        assert!(!is_hangul_syllable('ㅋ'));
        assert!(is_thai('ก'));
        assert!(is_thai('๙'));
        assert!(!is_thai('a'));
        assert!(!is_hangul('ก'));
    }

    #[test]
    fn request_trims_and_rejects_blank() {
        let req = TranslationRequest::new("  สวัสดีครับ \n").unwrap();
        assert_eq!(req.source_text(), "สวัสดีครับ");
        assert_eq!(req.direction(), Direction::ThToKr);
        assert!(TranslationRequest::new(" \t\n").is_none());
    }

    #[test]
    fn direction_display_and_tag() {
        assert_eq!(Direction::KrToTh.to_string(), "KR_TO_TH");
        assert_eq!(Direction::ThToKr.tag(), "TH2KR");
    }
}
