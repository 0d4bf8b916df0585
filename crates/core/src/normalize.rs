//! AI response normalizer.
//!
//! Turns the raw text reply of a generative model into a `serde_json::Value`
//! ready for shape validation. The reply is untrusted: it may be wrapped in
//! markdown code fences, surrounded by prose, or be slightly malformed JSON.
//!
//! The algorithm is:
//!
//! 1. strip leading/trailing code-fence markers (```` ``` ```` plus an
//!    optional language tag);
//! 2. take the span from the first `{` or `[` to the *last* closing brace or
//!    bracket of the same kind (greedy), which tolerates commentary before
//!    and after the payload but not prose interleaved with it;
//! 3. parse strictly;
//! 4. on failure, run a best-effort repair pass (trailing commas, unquoted
//!    keys, unterminated strings, unclosed brackets) and parse again.
//!
//! When the reply contains several independent JSON values the greedy span
//! covers all of them and the parse fails. Only the first value is ever a
//! candidate; this is a known limitation.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Opening fence at the very start of the (trimmed) reply.
static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("valid regex"));

/// Closing fence at the very end of the (trimmed) reply.
static FENCE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```$").expect("valid regex"));

/// The reply could not be turned into JSON, even after repair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not parse AI response as JSON: {message}")]
pub struct ParseFailure {
    /// The original reply, kept for diagnostics.
    pub raw: String,
    /// The underlying parser error (or a description of what was missing).
    pub message: String,
}

impl ParseFailure {
    fn new(raw: &str, message: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            message: message.into(),
        }
    }
}

/// Normalize a raw model reply into a JSON object or array.
///
/// Pure and deterministic.
pub fn normalize_ai_response(raw: &str) -> Result<Value, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::new(raw, "empty response"));
    }

    let unfenced = strip_code_fences(trimmed);
    let span = locate_json_span(unfenced)
        .ok_or_else(|| ParseFailure::new(raw, "no JSON object or array found"))?;

    match serde_json::from_str::<Value>(span) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            let repaired = repair_json(span);
            serde_json::from_str::<Value>(&repaired)
                .map_err(|_| ParseFailure::new(raw, strict_err.to_string()))
        }
    }
}

/// Remove a leading ```` ```lang ```` marker and a trailing ```` ``` ````
/// marker, if present. Inner whitespace is trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let mut out = text.trim();
    if let Some(m) = FENCE_OPEN_RE.find(out) {
        out = &out[m.end()..];
    }
    if let Some(m) = FENCE_CLOSE_RE.find(out) {
        out = &out[..m.start()];
    }
    out.trim()
}

/// Greedy span from the first `{`/`[` to the last matching closer.
///
/// When no closer of the same kind follows the opener (a truncated reply),
/// the span runs to the end of the text so the repair pass can close it.
fn locate_json_span(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c == '{' || c == '[')?;
    let closer = if text[start..].starts_with('{') { '}' } else { ']' };

    match text.rfind(closer) {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}

/// Best-effort repair of near-valid JSON.
///
/// Handles trailing commas before `}`/`]`, bare identifier keys inside
/// objects, a string left open at the end of input, a dangling `:` and
/// brackets that were never closed. Anything else passes through untouched.
pub fn repair_json(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                closers.push('}');
                out.push(c);
            }
            '[' => {
                closers.push(']');
                out.push(c);
            }
            '}' | ']' => {
                drop_trailing_comma(&mut out);
                if closers.last() == Some(&c) {
                    closers.pop();
                }
                out.push(c);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();

                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                let is_key = closers.last() == Some(&'}') && chars.get(j) == Some(&':');

                if is_key {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                continue;
            }
            _ => out.push(c),
        }
        i += 1;
    }

    if in_string {
        if escape {
            out.pop();
        }
        out.push('"');
    }

    let tail = out.trim_end();
    if tail.ends_with(':') {
        out.truncate(tail.len());
        out.push_str(" null");
    }

    while let Some(closer) = closers.pop() {
        drop_trailing_comma(&mut out);
        out.push(closer);
    }

    out
}

/// Remove trailing whitespace and a single trailing comma from `out`.
fn drop_trailing_comma(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    if out.ends_with(',') {
        out.pop();
    }
}
