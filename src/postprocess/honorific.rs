//! Optional polite-particle enforcement for Thai output.
//!
//! When enabled, Thai output that ends with neither a masculine polite
//! ending nor a feminine-register ending gets "ครับ" appended.  Trailing
//! punctuation, emoji and `555` laughter stay after the particle:
//!
//! ```text
//! "ไปกินข้าวกัน 555"  →  "ไปกินข้าวกันครับ 555"
//! "เย็นนี้กินอะไรดี?"  →  "เย็นนี้กินอะไรดีครับ?"
//! ```

use crate::lang::is_thai;

/// Particle appended to bare Thai output.
pub const POLITE_PARTICLE: &str = "ครับ";

const POLITE_ENDINGS: &[&str] = &["ครับ", "ครับผม", "คร้าบ"];

const FEMININE_ENDINGS: &[&str] = &["ค่ะ", "คะ", "ค่า", "จ้ะ", "จ้า"];

/// Append [`POLITE_PARTICLE`] where the register is still bare.
pub fn enforce_polite_particle(text: &str) -> String {
    let (core, tail) = split_tail(text);
    if core.is_empty() || !core.chars().any(is_thai) {
        return text.to_string();
    }

    let already_marked = POLITE_ENDINGS
        .iter()
        .chain(FEMININE_ENDINGS)
        .any(|ending| core.ends_with(ending));
    if already_marked {
        return text.to_string();
    }

    format!("{core}{POLITE_PARTICLE}{tail}")
}

/// Split off trailing whitespace, punctuation, emoji and `555` runs.
///
/// Thai vowel and tone marks are non-alphanumeric combining characters, so
/// the Thai block is always treated as part of the core.
fn split_tail(text: &str) -> (&str, &str) {
    let mut core = text;
    loop {
        let trimmed = core.trim_end_matches(|c: char| !is_thai(c) && !c.is_alphanumeric());
        let trimmed = strip_laughter_suffix(trimmed);
        if trimmed.len() == core.len() {
            break;
        }
        core = trimmed;
    }
    (core, &text[core.len()..])
}

fn strip_laughter_suffix(text: &str) -> &str {
    let without = text.trim_end_matches('5');
    let run = text.len() - without.len();
    if run >= 3 && !without.ends_with(|c: char| c.is_ascii_digit()) {
        without
    } else {
        text
    }
}
