//! Layered parser for raw completion text.
//!
//! Models do not always honour the requested answer shape, so parsing walks
//! an ordered list of progressively looser strategies:
//!
//! | # | Strategy      | Input tried                                          |
//! |---|---------------|------------------------------------------------------|
//! | 1 | `Strict`      | trimmed text as a JSON object                        |
//! | 2 | `Repaired`    | code fences stripped, smart quotes normalised        |
//! | 3 | `BraceSpan`   | outermost `{ ... }` of the repaired text             |
//! | 4 | `PlainLines`  | first line = translation, second line = literal      |
//!
//! JSON objects are normalised from every recognised [`SchemaDialect`]; the
//! configured dialect is tried first.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::SchemaDialect;
use crate::lang::Direction;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Canonical parsed answer, before post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub primary_text: String,
    pub literal_back_translation: Option<String>,
}

/// Which strategy produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Strict,
    Repaired,
    BraceSpan,
    PlainLines,
}

impl ParseStrategy {
    /// Order in which strategies are tried.
    pub const ORDER: [ParseStrategy; 4] = [
        ParseStrategy::Strict,
        ParseStrategy::Repaired,
        ParseStrategy::BraceSpan,
        ParseStrategy::PlainLines,
    ];

    /// `true` for the degraded, unstructured path.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseStrategy::PlainLines)
    }
}

/// Successful parse plus the strategy that got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub result: TranslationResult,
    pub strategy: ParseStrategy,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace (or fences) in the completion.
    #[error("completion contained no usable text")]
    Empty,

    /// Valid JSON object, but none of the recognised translation fields.
    #[error("JSON answer has no recognised translation field")]
    UnrecognizedSchema,

    /// Starts like a JSON answer but never parsed (truncated, unbalanced).
    /// Splitting it into lines would relay raw JSON to the user.
    #[error("JSON answer is malformed")]
    MalformedJson,
}

/// Prefixes the model puts in front of the literal line.
const LITERAL_MARKERS: &[&str] = &[
    "(직역)", "[직역]", "직역:", "직역 :", "직역", "(literal)", "literal:", "Literal:",
];

// ---------------------------------------------------------------------------
// ResponseParser
// ---------------------------------------------------------------------------

/// Normalises raw completion text into a [`TranslationResult`].
#[derive(Debug, Clone)]
pub struct ResponseParser {
    dialects: Vec<SchemaDialect>,
}

impl ResponseParser {
    /// `preferred` is tried first; the remaining dialects follow.
    pub fn new(preferred: SchemaDialect) -> Self {
        let mut dialects = vec![preferred];
        dialects.extend(SchemaDialect::ALL.iter().copied().filter(|d| *d != preferred));
        Self { dialects }
    }

    pub fn parse(&self, raw: &str, direction: Direction) -> Result<ParsedResponse, ParseError> {
        let repaired = repair(raw);
        let mut saw_object = false;

        for strategy in ParseStrategy::ORDER {
            let candidate = match strategy {
                ParseStrategy::Strict => Some(raw.trim().to_string()),
                ParseStrategy::Repaired => Some(repaired.clone()),
                ParseStrategy::BraceSpan => brace_span(&repaired).map(str::to_string),
                ParseStrategy::PlainLines => {
                    if saw_object {
                        return Err(ParseError::UnrecognizedSchema);
                    }
                    if looks_like_json(&repaired) {
                        return Err(ParseError::MalformedJson);
                    }
                    return plain_lines(&repaired)
                        .map(|result| ParsedResponse { result, strategy })
                        .ok_or(ParseError::Empty);
                }
            };

            let Some(candidate) = candidate else { continue };
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&candidate) {
                saw_object = true;
                if let Some(result) = self.from_object(&map, direction) {
                    return Ok(ParsedResponse { result, strategy });
                }
            }
        }

        Err(ParseError::Empty)
    }

    fn from_object(&self, map: &Map<String, Value>, direction: Direction) -> Option<TranslationResult> {
        self.dialects
            .iter()
            .find_map(|dialect| from_dialect(map, *dialect, direction))
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(SchemaDialect::default())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn from_dialect(
    map: &Map<String, Value>,
    dialect: SchemaDialect,
    direction: Direction,
) -> Option<TranslationResult> {
    let (primary_key, literal_key) = match (dialect, direction) {
        (SchemaDialect::ModeFields, Direction::KrToTh) => ("th", Some("ko_backliteral")),
        (SchemaDialect::ModeFields, Direction::ThToKr) => ("ko", None),
        (SchemaDialect::PrimaryPreview, _) => ("primary", Some("preview")),
        (SchemaDialect::TranslatedLiteral, _) => ("translated", Some("literal")),
    };

    let primary = non_empty_str(map, primary_key)?;
    let literal = literal_key.and_then(|key| non_empty_str(map, key));

    Some(TranslationResult {
        primary_text: primary,
        literal_back_translation: literal,
    })
}

fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Strip markdown code fences and normalise typographic quotes.
fn repair(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with("```") {
        // Drop the opening fence line, including any language tag.
        text = match text.find('\n') {
            Some(idx) => &text[idx + 1..],
            None => text.trim_start_matches('`'),
        };
    }
    let text = text.trim_end();
    let text = text.strip_suffix("```").unwrap_or(text);

    text.trim()
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

fn looks_like_json(text: &str) -> bool {
    text.starts_with('{') || text.starts_with('[')
}

/// Outermost `{ ... }` span, if any.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn plain_lines(text: &str) -> Option<TranslationResult> {
    let mut lines = text
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty() && !line.starts_with("```"));

    let primary = lines.next()?;
    let literal = lines
        .next()
        .map(|line| strip_literal_marker(&line))
        .filter(|line| !line.is_empty());

    Some(TranslationResult {
        primary_text: primary,
        literal_back_translation: literal,
    })
}

fn clean_line(line: &str) -> String {
    let line = line.trim();
    let unquoted = line
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(line);
    unquoted.trim().to_string()
}

fn strip_literal_marker(line: &str) -> String {
    for marker in LITERAL_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return clean_line(rest);
        }
    }
    line.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
