//! Deterministic text rules applied to the model's translation.
//!
//! The model is asked to follow all of these rules already; this module makes
//! them hold regardless.  For Thai output ([`Direction::KrToTh`]) the steps
//! run in a fixed order:
//!
//! 1. [`names::enforce_name`]: "깨우" always renders as "แก้ว".
//! 2. [`script::strip_hangul`]: no Hangul left in Thai text.
//! 3. [`laughter::to_thai`]: ㅋㅋ/ㅎㅎ/하하 → `555`, long runs collapsed.
//! 4. [`honorific::enforce_polite_particle`]: only when enabled.
//!
//! Korean output ([`Direction::ThToKr`]) only gets removal of leaked Thai
//! characters followed by laughter normalisation.

pub mod honorific;
pub mod laughter;
pub mod names;
pub mod script;

use crate::config::StyleConfig;
use crate::lang::{Direction, TranslationRequest};
use crate::llm::TranslationResult;

/// Applies the rule chain for one direction.
#[derive(Debug, Clone)]
pub struct PostProcessor {
    enforce_honorific: bool,
}

impl PostProcessor {
    pub fn new(style: &StyleConfig) -> Self {
        Self {
            enforce_honorific: style.enforce_honorific,
        }
    }

    /// Rewrite a primary translation of `source`.
    pub fn apply(&self, source: &str, primary: &str, direction: Direction) -> String {
        match direction {
            Direction::KrToTh => {
                let text = names::enforce_name(source, primary);
                let text = script::strip_hangul(&text);
                let text = laughter::to_thai(&text);
                if self.enforce_honorific {
                    honorific::enforce_polite_particle(&text)
                } else {
                    text
                }
            }
            Direction::ThToKr => {
                let text = script::strip_thai(primary);
                laughter::to_korean(&text)
            }
        }
    }

    /// Post-process a parsed result.
    ///
    /// The literal back-translation is a Korean rendering of Thai output, so
    /// it only exists for [`Direction::KrToTh`]; it is dropped otherwise.
    pub fn process(&self, request: &TranslationRequest, result: TranslationResult) -> TranslationResult {
        let primary_text = self.apply(request.source_text(), &result.primary_text, request.direction());

        let literal_back_translation = match request.direction() {
            Direction::KrToTh => result
                .literal_back_translation
                .map(|literal| literal.trim().to_string())
                .filter(|literal| !literal.is_empty()),
            Direction::ThToKr => None,
        };

        TranslationResult {
            primary_text,
            literal_back_translation,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{is_hangul, is_thai};

    fn processor(enforce_honorific: bool) -> PostProcessor {
        PostProcessor::new(&StyleConfig {
            enforce_honorific,
            ..StyleConfig::default()
        })
    }

    #[test]
    fn name_and_laughter_scenario() {
        let out = processor(true).apply("깨우야 ㅋㅋㅋ 밥 먹자", "깨우야 ㅋㅋㅋ กินข้าวกัน", Direction::KrToTh);

        assert!(out.contains("แก้ว"), "{out}");
        assert!(out.contains("555"), "{out}");
        assert!(!out.chars().any(is_hangul), "{out}");
        assert_eq!(out, "แก้ว 555 กินข้าวกันครับ");
    }

    #[test]
    fn dropped_name_is_prepended() {
        let out = processor(false).apply("깨우 뭐해?", "ทำอะไรอยู่", Direction::KrToTh);
        assert_eq!(out, "แก้ว ทำอะไรอยู่");
    }

    #[test]
    fn honorific_toggle_is_respected() {
        assert_eq!(
            processor(true).apply("밥 먹자", "กินข้าวกัน", Direction::KrToTh),
            "กินข้าวกันครับ"
        );
        assert_eq!(
            processor(false).apply("밥 먹자", "กินข้าวกัน", Direction::KrToTh),
            "กินข้าวกัน"
        );
    }

    #[test]
    fn korean_output_loses_thai_and_gets_korean_laughter() {
        let out = processor(true).apply("กินข้าวหรือยัง 555", "밥 먹었어요? 555 ครับ", Direction::ThToKr);
        assert_eq!(out, "밥 먹었어요? ㅋㅋㅋ");
        assert!(!out.chars().any(is_thai));
    }

    #[test]
    fn laughter_joined_by_thai_removal_still_collapses() {
        let out = processor(true).apply("ขำ", "ㅋㅋㅋกㅋㅋㅋ 좋아요", Direction::ThToKr);
        assert_eq!(out, "ㅋㅋㅋ 좋아요");
        assert_eq!(laughter::to_korean(&out), out);
    }

    #[test]
    fn thai_laughter_in_korean_output_is_converted() {
        let out = processor(true).apply("ตลก", "진짜 웃겨요 ฮ่าๆ", Direction::ThToKr);
        assert_eq!(out, "진짜 웃겨요 ㅋㅋㅋ");
        assert!(!out.chars().any(is_thai));
    }

    #[test]
    fn korean_output_never_gets_thai_particle() {
        let out = processor(true).apply("ขอบคุณ", "고마워요", Direction::ThToKr);
        assert_eq!(out, "고마워요");
    }

    #[test]
    fn process_drops_literal_for_korean_output() {
        let request = TranslationRequest::new("กินข้าวหรือยังครับ").unwrap();
        let result = TranslationResult {
            primary_text: "밥 먹었어요?".into(),
            literal_back_translation: Some("กินข้าวหรือยัง".into()),
        };
        let processed = processor(true).process(&request, result);
        assert_eq!(processed.primary_text, "밥 먹었어요?");
        assert!(processed.literal_back_translation.is_none());
    }

    #[test]
    fn process_keeps_trimmed_literal_for_thai_output() {
        let request = TranslationRequest::new("오늘 저녁에 뭐 먹을래?").unwrap();
        let result = TranslationResult {
            primary_text: "เย็นนี้จะกินอะไรดี".into(),
            literal_back_translation: Some("  오늘 저녁 무엇을 먹을 것인가  ".into()),
        };
        let processed = processor(true).process(&request, result);
        assert_eq!(processed.primary_text, "เย็นนี้จะกินอะไรดีครับ");
        assert_eq!(
            processed.literal_back_translation.as_deref(),
            Some("오늘 저녁 무엇을 먹을 것인가")
        );
    }

    #[test]
    fn all_hangul_output_becomes_empty() {
        let out = processor(true).apply("밥 먹자", "밥 먹자", Direction::KrToTh);
        assert!(out.is_empty());
    }
}
