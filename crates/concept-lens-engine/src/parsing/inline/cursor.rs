/// A cursor for byte-by-byte inline parsing with position tracking.
///
/// Operates over a string slice while tracking the absolute byte position
/// in the original rope (via `base` offset). Constructs only start at ASCII
/// delimiters, so positions reported at construct boundaries are always on
/// char boundaries.
#[derive(Clone)]
pub struct Cursor<'a> {
    pub s: &'a str,
    /// Base offset in the rope (added to local index for absolute positions).
    pub base: usize,
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s
            .as_bytes()
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Length of the run of `b` bytes starting at the cursor.
    pub fn run_len(&self, b: u8) -> usize {
        self.s
            .as_bytes()
            .get(self.i..)
            .map_or(0, |rest| rest.iter().take_while(|&&x| x == b).count())
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes. Callers ensure `n` stays within the input.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }
}
