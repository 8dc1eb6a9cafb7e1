use xi_rope::Rope;

use super::span::Span;

/// Extracts the text for a span from the rope as an owned String.
///
/// Spans past the end of the rope are clamped, matching how stale ranges are
/// tolerated elsewhere after edits.
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    let len = rope.len();
    let start = sp.start.min(len);
    let end = sp.end.min(len).max(start);
    rope.slice_to_cow(start..end).into_owned()
}

/// Shortens `s` to at most `max` bytes with a "..." suffix, never splitting
/// a UTF-8 sequence.
///
/// Used for human-readable reports of decorated text.
pub fn preview(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = s[..cut].to_string();
    out.push_str("...");
    out
}
