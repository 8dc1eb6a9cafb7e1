use crate::parsing::rope::{lines::LineRef, span::Span};

use super::kinds::{BlockQuote, CodeFence, FenceSig, Heading};

/// Classification of a single line containing only local facts.
///
/// Phase 1 of block parsing: each line is classified independently without
/// reference to surrounding context.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Full byte span of this line in the rope, terminator included.
    pub line: Span,
    /// Whether the line is blank (whitespace only after stripping prefixes).
    pub is_blank: bool,
    /// Number of blockquote `>` prefixes found.
    pub quote_depth: u8,
    /// Byte span of the line body after stripping quote prefixes. Never
    /// includes the line terminator.
    pub remainder_span: Span,
    pub remainder_text: String,
    /// If the remainder looks like a fence opener/closer.
    pub fence_sig: Option<FenceSig>,
    /// `(level, content_offset)` if the remainder looks like an ATX heading.
    pub heading: Option<(u8, usize)>,
}

impl LineClass {
    /// Byte span of the line body as stored in the source, prefixes included.
    pub fn body_span(&self) -> Span {
        Span::new(self.line.start, self.remainder_span.end)
    }
}

/// Classifies individual lines for the block parsing phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let trimmed = lr.text.trim_end_matches(['\r', '\n']);
        let is_blank = trimmed.trim().is_empty();

        let (qd, idx) = BlockQuote::strip_prefixes(trimmed);
        let remainder = &trimmed[idx..];
        let remainder_span = Span::new(lr.span.start + idx, lr.span.start + trimmed.len());

        LineClass {
            line: lr.span,
            is_blank,
            quote_depth: qd,
            remainder_span,
            remainder_text: remainder.to_string(),
            fence_sig: CodeFence::sig(remainder),
            heading: Heading::open(remainder),
        }
    }
}
