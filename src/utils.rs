/// Shared utility functions

/// Truncate a string to at most `max_chars` characters, never splitting a
/// UTF-8 sequence
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
