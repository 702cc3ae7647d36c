//! Lightweight inspection of card text.
//!
//! Card terms and definitions are free-form strings that may embed fenced
//! code blocks or math notation. Nothing here changes the text; it only
//! classifies it and splits it for presentation layers.

use serde::{Deserialize, Serialize};

const FENCE: &str = "```";
const MATH_SYMBOLS: [char; 3] = ['∫', '∑', '√'];

/// A piece of card text, either prose or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Text(String),
    Code {
        language: Option<String>,
        code: String,
    },
}

/// Returns true if the text looks like it contains source code.
#[must_use]
pub fn detect_code(text: &str) -> bool {
    text.contains(FENCE) || text.contains("function") || text.contains("class")
}

/// Returns true if the text contains math notation (integrals, sums, roots
/// or a caret exponent such as `x^2`).
#[must_use]
pub fn detect_math(text: &str) -> bool {
    if text.contains(MATH_SYMBOLS) {
        return true;
    }
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '^' && chars.peek().is_some_and(char::is_ascii_digit) {
            return true;
        }
    }
    false
}

/// Splits text on code fences.
///
/// Odd-numbered parts between fences are code; text on the opening fence line
/// names its language. Blank prose parts are dropped. An unterminated fence
/// treats the rest of the text as code.
#[must_use]
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    for (i, part) in text.split(FENCE).enumerate() {
        if i % 2 == 1 {
            let (first, rest) = part.split_once('\n').unwrap_or((part, ""));
            let language = Some(first.trim())
                .filter(|l| !l.is_empty())
                .map(ToString::to_string);
            out.push(Segment::Code {
                language,
                code: rest.trim_end_matches('\n').to_string(),
            });
        } else {
            let prose = part.trim();
            if !prose.is_empty() {
                out.push(Segment::Text(prose.to_string()));
            }
        }
    }
    out
}
