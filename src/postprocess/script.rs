//! Script-leak removal: output must never mix Korean and Thai script.

use std::sync::LazyLock;

use regex::Regex;

use crate::lang::{is_hangul, is_thai};

use super::laughter::{KOREAN_LAUGHTER_RE, THAI_LAUGHTER_RE};

static EXTRA_SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));

/// Remove Hangul from Thai output.
///
/// Korean laughter runs (ㅋㅋ, 하하, ...) are kept; laughter normalisation
/// turns them into `555` afterwards.
pub fn strip_hangul(text: &str) -> String {
    strip_outside(text, &KOREAN_LAUGHTER_RE, is_hangul)
}

/// Remove Thai from Korean output.
///
/// Thai laughter (ฮ่าๆ, ...) is kept for laughter normalisation, which
/// runs afterwards so that runs joined by the removal still collapse.
pub fn strip_thai(text: &str) -> String {
    strip_outside(text, &THAI_LAUGHTER_RE, is_thai)
}

/// Drop every char matching `unwanted`, except inside `keep` matches.
fn strip_outside(text: &str, keep: &Regex, unwanted: fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for kept in keep.find_iter(text) {
        out.extend(text[last..kept.start()].chars().filter(|c| !unwanted(*c)));
        out.push_str(kept.as_str());
        last = kept.end();
    }
    out.extend(text[last..].chars().filter(|c| !unwanted(*c)));

    tidy_spaces(&out)
}

/// Collapse the gaps left behind by removed words.
fn tidy_spaces(text: &str) -> String {
    let collapsed = EXTRA_SPACES_RE.replace_all(text, " ");
    collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hangul_is_removed_from_thai() {
        assert_eq!(strip_hangul("แก้ว야 กินข้าวกัน 밥"), "แก้ว กินข้าวกัน");
    }

    #[test]
    fn korean_laughter_survives_for_normalisation() {
        assert_eq!(strip_hangul("ไปกัน ㅋㅋㅋ 좋아"), "ไปกัน ㅋㅋㅋ");
        assert_eq!(strip_hangul("하하 จริงเหรอ"), "하하 จริงเหรอ");
    }

    #[test]
    fn lone_jamo_is_removed() {
        assert_eq!(strip_hangul("โอเค ㅋ"), "โอเค");
    }

    #[test]
    fn thai_is_removed_from_korean() {
        assert_eq!(strip_thai("밥 먹었어요? ครับ"), "밥 먹었어요?");
        assert!(!strip_thai("แก้ว 안녕").chars().any(is_thai));
    }

    #[test]
    fn thai_laughter_survives_for_normalisation() {
        assert_eq!(strip_thai("맞아요 ฮ่าๆ ครับ"), "맞아요 ฮ่าๆ");
    }

    #[test]
    fn clean_text_is_unchanged() {
        assert_eq!(strip_hangul("สวัสดีครับ 🙂"), "สวัสดีครับ 🙂");
        assert_eq!(strip_thai("좋아요 ㅋㅋㅋ"), "좋아요 ㅋㅋㅋ");
    }
}
