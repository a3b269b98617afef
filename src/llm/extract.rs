//! Commit message extraction from raw LLM responses.
//!
//! Models often wrap the message in a fenced block or add commentary after
//! it. This module reduces a response to the message itself.

const FENCE: &str = "```";

/// Extract the commit message from a model response.
///
/// Tries, in order:
/// 1. The interior of the first closed ` ``` ` fenced block (an optional
///    language tag on the opening line is dropped)
/// 2. The text after an unclosed fence, treated as the block interior
/// 3. The first paragraph, i.e. everything before the first blank line
///
/// The result never contains a fence. CRLF line endings are normalized.
/// An all-whitespace response yields an empty string. Callers must reject it.
pub fn extract_commit_message(response: &str) -> String {
    let response = response.replace("\r\n", "\n");

    if let Some(inner) = first_fenced_block(&response) {
        return inner.trim().to_string();
    }

    let body = match response.find(FENCE) {
        Some(start) => strip_language_tag(&response[start + FENCE.len()..]),
        None => response.as_str(),
    };

    body.trim_start_matches('\n')
        .split("\n\n")
        .next()
        .unwrap_or_default()
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// Interior of the first closed fenced block, if any.
fn first_fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    let end = rest.find(FENCE)?;
    Some(strip_language_tag(&rest[..end]))
}

/// Drop an opening line made only of word characters (a language tag).
fn strip_language_tag(inner: &str) -> &str {
    if let Some(newline) = inner.find('\n') {
        let tag = inner[..newline].trim_end_matches('\r');
        if tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return &inner[newline + 1..];
        }
    }
    inner
}
