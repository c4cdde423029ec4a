//! Laughter-marker mapping between Korean and Thai chat conventions.
//!
//! | Direction | Input markers                 | Canonical output |
//! |-----------|-------------------------------|------------------|
//! | → Thai    | ㅋㅋ…, ㅎㅎ…, 하하…           | `555`            |
//! | → Korean  | 555…, ฮ่าๆ, ฮ่าฮ่า, ฮาๆ       | `ㅋㅋㅋ`          |
//!
//! Long runs (five or more) collapse to the canonical three-character run.
//! Both functions are idempotent.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical Thai laughter token.
pub const THAI_LAUGHTER: &str = "555";

/// Canonical Korean laughter token.
pub const KOREAN_LAUGHTER: &str = "ㅋㅋㅋ";

/// Korean laughter runs.  Single ㅋ/ㅎ are not laughter on their own.
pub(crate) static KOREAN_LAUGHTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ㅋㅎ]{2,}|(?:하){2,}").expect("valid regex"));

/// Thai written laughter (ฮ่าๆ, ฮาๆ, ฮ่าฮ่า).
pub(crate) static THAI_LAUGHTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:ฮ่า|ฮา)+ๆ+|(?:ฮ่า){2,}").expect("valid regex"));

static LONG_KIEUK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ㅋ{5,}").expect("valid regex"));

static LONG_HIEUH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ㅎ{5,}").expect("valid regex"));

/// Normalise laughter for Thai output.
///
/// ```
/// use korthai::postprocess::laughter::to_thai;
///
/// assert_eq!(to_thai("ไปกัน ㅋㅋㅋ"), "ไปกัน 555");
/// assert_eq!(to_thai("5555555"), "555");
/// ```
pub fn to_thai(text: &str) -> String {
    let replaced = KOREAN_LAUGHTER_RE.replace_all(text, THAI_LAUGHTER);
    collapse_five_runs(&replaced, 5, THAI_LAUGHTER)
}

/// Normalise laughter for Korean output.
pub fn to_korean(text: &str) -> String {
    let replaced = THAI_LAUGHTER_RE.replace_all(text, KOREAN_LAUGHTER);
    let replaced = collapse_five_runs(&replaced, 3, KOREAN_LAUGHTER);
    let replaced = LONG_KIEUK_RE.replace_all(&replaced, KOREAN_LAUGHTER);
    LONG_HIEUH_RE.replace_all(&replaced, "ㅎㅎㅎ").into_owned()
}

/// Replace every maximal ASCII-digit run made only of `5`s and at least
/// `min_run` long.  Runs that are part of a longer number are left alone.
fn collapse_five_runs(text: &str, min_run: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() {
            run.push(c);
        } else {
            flush_run(&mut out, &mut run, min_run, replacement);
            out.push(c);
        }
    }
    flush_run(&mut out, &mut run, min_run, replacement);
    out
}

fn flush_run(out: &mut String, run: &mut String, min_run: usize, replacement: &str) {
    if run.len() >= min_run && run.chars().all(|c| c == '5') {
        out.push_str(replacement);
    } else {
        out.push_str(run);
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_markers_become_555() {
        assert_eq!(to_thai("ㅋㅋ"), "555");
        assert_eq!(to_thai("ㅎㅎㅎ 좋아"), "555 좋아");
        assert_eq!(to_thai("하하하"), "555");
        assert_eq!(to_thai("ㅋㅋㅋㅎㅎ"), "555");
    }

    #[test]
    fn adjacent_markers_collapse_to_one_token() {
        assert_eq!(to_thai("ㅋㅋ555"), "555");
        assert_eq!(to_thai("5555555555 จริง"), "555 จริง");
    }

    #[test]
    fn numbers_are_not_laughter() {
        assert_eq!(to_thai("ราคา 15555 บาท"), "ราคา 15555 บาท");
        assert_eq!(to_thai("โทร 5555"), "โทร 5555");
    }

    #[test]
    fn single_jamo_is_not_laughter() {
        assert_eq!(to_thai("ㅋ"), "ㅋ");
    }

    #[test]
    fn thai_markers_become_korean() {
        assert_eq!(to_korean("ฮ่าๆ"), "ㅋㅋㅋ");
        assert_eq!(to_korean("ฮ่าฮ่าฮ่า 맞아요"), "ㅋㅋㅋ 맞아요");
        assert_eq!(to_korean("555 좋아요"), "ㅋㅋㅋ 좋아요");
        assert_eq!(to_korean("ฮาๆๆ"), "ㅋㅋㅋ");
    }

    #[test]
    fn long_korean_runs_collapse() {
        assert_eq!(to_korean("ㅋㅋㅋㅋㅋㅋㅋㅋ"), "ㅋㅋㅋ");
        assert_eq!(to_korean("ㅎㅎㅎㅎㅎ"), "ㅎㅎㅎ");
        assert_eq!(to_korean("ㅋㅋ 555"), "ㅋㅋ ㅋㅋㅋ");
        assert_eq!(to_korean("ㅋㅋ555"), "ㅋㅋㅋ");
    }

    #[test]
    fn normalisation_is_idempotent() {
        let samples = [
            "ㅋㅋ555 ㅎㅎ 하하하 55555",
            "ㅋㅋㅋㅋ 5555 ฮ่าๆ",
            "ไปกัน ㅋ 5 55 555 5555 55555",
            "ฮ่าฮ่า ㅋㅋㅋㅋㅋㅋ ㅎㅎㅎㅎㅎㅎ 555555",
            "plain text 123",
        ];
        for sample in samples {
            let thai = to_thai(sample);
            assert_eq!(to_thai(&thai), thai, "to_thai not idempotent for {sample:?}");
            let korean = to_korean(sample);
            assert_eq!(to_korean(&korean), korean, "to_korean not idempotent for {sample:?}");
        }
    }
}
