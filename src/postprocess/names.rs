//! Fixed proper-noun mapping: "깨우" is always "แก้ว" in Thai output.

/// Name as written by the Korean speaker.
pub const SOURCE_NAME: &str = "깨우";

/// The only accepted Thai rendering.
pub const TARGET_NAME: &str = "แก้ว";

/// Renderings models have produced instead of [`TARGET_NAME`], including the
/// untranslated Korean name itself.
const MISTRANSLITERATIONS: &[&str] = &[
    SOURCE_NAME,
    "แก๊อู",
    "แก้อู",
    "แกอู",
    "แคอู",
    "เกะอู",
    "Kkaewoo",
    "Kkaeu",
    "Kaewoo",
];

/// Guarantee the name mapping when the source mentions the name.
///
/// 1. Source lacks "깨우" or output already has "แก้ว" → unchanged.
/// 2. Known mis-transliterations are rewritten to "แก้ว".
/// 3. Nothing matched → "แก้ว " is prepended.
pub fn enforce_name(source: &str, output: &str) -> String {
    if !source.contains(SOURCE_NAME) || output.contains(TARGET_NAME) {
        return output.to_string();
    }

    let mut rewritten = output.to_string();
    for wrong in MISTRANSLITERATIONS {
        if rewritten.contains(wrong) {
            rewritten = rewritten.replace(wrong, TARGET_NAME);
        }
    }

    if rewritten.contains(TARGET_NAME) {
        rewritten
    } else {
        format!("{TARGET_NAME} {}", output.trim_start())
    }
}
