//! Small text helpers shared across crates.

/// Truncate `text` to at most `max_chars` characters, never splitting a
/// UTF-8 code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Whether `text` contains anything other than whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
