//! Content projection types for handling nested prefix containers.
//!
//! A block's plain text is the concatenation of its text spans. Container
//! prefixes are skipped, line terminators between lines are kept, so every
//! plain-text offset maps back to exactly one source offset.

use xi_rope::Rope;

use crate::parsing::rope::{slice::slice_to_string, span::Span};

/// A single line's content projection within a block.
///
/// # Invariants
///
/// - `prefix` and `content` are within `raw_line`
/// - `prefix.end <= content.start`
/// - `content.end <= raw_line.end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Full physical line span in the rope, terminator included.
    pub raw_line: Span,
    /// Container prefix region on this line (e.g. `> `).
    pub prefix: Span,
    /// Remainder after stripping container prefixes.
    pub content: Span,
}

/// How a block's meaningful content is represented.
///
/// `Contiguous` when the content is one unbroken source range, `Lines` when
/// per-line prefixes interrupt it (multi-line blocks inside blockquotes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    Contiguous(Span),
    Lines(Vec<ContentLine>),
}

impl ContentView {
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        matches!(self, ContentView::Contiguous(_))
    }

    #[must_use]
    pub fn is_lines(&self) -> bool {
        matches!(self, ContentView::Lines(_))
    }

    /// Source spans whose concatenation is the block's plain text.
    ///
    /// Every line but the last extends to the end of its raw line so the
    /// terminator stays part of the text. Empty spans are omitted.
    pub fn text_spans(&self) -> Vec<Span> {
        match self {
            ContentView::Contiguous(span) => {
                if span.is_empty() {
                    vec![]
                } else {
                    vec![*span]
                }
            }
            ContentView::Lines(lines) => {
                let last = lines.len().saturating_sub(1);
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        if i < last {
                            Span::new(line.content.start, line.raw_line.end)
                        } else {
                            line.content
                        }
                    })
                    .filter(|s| !s.is_empty())
                    .collect()
            }
        }
    }

    /// Smallest span covering all content, `None` for an empty line list.
    pub fn bounds(&self) -> Option<Span> {
        match self {
            ContentView::Contiguous(span) => Some(*span),
            ContentView::Lines(lines) => {
                let first = lines.first()?;
                let last = lines.last()?;
                Some(Span::new(first.content.start, last.content.end))
            }
        }
    }

    /// The block's plain text, prefixes removed.
    #[must_use]
    pub fn join_content(&self, rope: &Rope) -> String {
        self.text_spans()
            .into_iter()
            .map(|span| slice_to_string(rope, span))
            .collect()
    }
}
