use crate::parsing::rope::span::Span;

/// A parsed inline node with byte spans into the rope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Plain text that isn't part of any special construct.
    Text(Span),
    /// A code span. Raw zone: nothing is parsed or matched inside.
    CodeSpan {
        /// Full span including backticks.
        full: Span,
        inner: Span,
    },
    /// A wiki-style link `[[target]]` or `[[target|alias]]`. Hosts treat these
    /// as mention markers: they are rendered by their own machinery and never
    /// receive term decorations.
    WikiLink {
        full: Span,
        target: Span,
        alias: Option<Span>,
    },
}

impl InlineNode {
    /// Full span covered by this node, delimiters included.
    pub fn span(&self) -> Span {
        match self {
            InlineNode::Text(sp) => *sp,
            InlineNode::CodeSpan { full, .. } | InlineNode::WikiLink { full, .. } => *full,
        }
    }
}
