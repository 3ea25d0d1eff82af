//! Whitespace normalization and bounded truncation for log lines.

use crate::pattern::RE_WHITESPACE;

/// Marker appended when text is truncated.
const ELLIPSIS: &str = "...";

/// Collapse whitespace runs to single spaces, trim, and cap the result at
/// `max_chars` characters.
///
/// If the normalized text fits, it is returned as-is. Otherwise the first
/// `max_chars - 3` characters are kept and `...` is appended, so a truncated
/// result is exactly `max_chars` characters long. `max_chars` below the
/// ellipsis length clamps the kept prefix to zero (the result is the bare
/// `...`). Lengths are counted in characters, never bytes, so multi-byte
/// input cannot be split mid-character.
///
/// Empty input returns the empty string.
pub fn condense_text(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized = RE_WHITESPACE.replace_all(text, " ");
    let normalized = normalized.trim();

    if normalized.chars().count() <= max_chars {
        return normalized.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = normalized.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
