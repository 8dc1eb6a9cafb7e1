/// Blockquote container type with owned delimiter constant.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: u8 = b'>';

    /// Strips blockquote prefixes from a line, returning `(depth, byte_offset)`.
    ///
    /// Handles `> text`, `>> nested` and `> > spaced nested`. Leading spaces
    /// are consumed even when no prefix follows.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            while b.get(i) == Some(&b' ') {
                i += 1;
            }
            if b.get(i) != Some(&Self::PREFIX) {
                break;
            }
            depth = depth.saturating_add(1);
            i += 1;
            if b.get(i) == Some(&b' ') {
                i += 1;
            }
        }
        (depth, i)
    }
}
