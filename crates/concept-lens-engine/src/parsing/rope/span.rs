use std::ops::Range;

/// A byte range `[start, end)` into the rope.
///
/// All parsed nodes store spans rather than copied text, so slicing the rope
/// with any span reproduces the exact source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when `other` lies entirely inside this span.
    #[must_use]
    pub fn contains_span(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the two spans share at least one byte.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[must_use]
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Span {
            start: r.start,
            end: r.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(sp: Span) -> Self {
        sp.start..sp.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlaps_requires_shared_byte() {
        let a = Span::new(0, 5);
        assert!(a.overlaps(Span::new(4, 8)));
        assert!(!a.overlaps(Span::new(5, 8)));
        assert!(!Span::new(5, 8).overlaps(a));
    }

    #[test]
    fn contains_span_is_inclusive_of_edges() {
        let a = Span::new(2, 10);
        assert!(a.contains_span(Span::new(2, 10)));
        assert!(a.contains_span(Span::new(3, 4)));
        assert!(!a.contains_span(Span::new(1, 4)));
    }

    #[test]
    fn len_saturates_for_inverted_span() {
        assert_eq!(Span::new(7, 3).len(), 0);
        assert!(Span::new(7, 3).is_empty());
    }
}
