use serde::{Deserialize, Serialize};

use crate::parsing::rope::span::Span;

use super::{
    content::ContentView,
    kinds::{BlockId, FenceKind},
};

/// A frame in the container stack representing a nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerFrame {
    /// A blockquote container with its nesting depth.
    BlockQuote {
        /// How many `>` prefixes (1 = single quote, 2 = nested, etc.)
        depth: u8,
    },
}

/// The kind of a leaf block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// A paragraph block (default when no other block opener matches).
    Paragraph,
    /// An ATX heading.
    Heading { level: u8 },
    /// A fenced code block (``` or ~~~).
    FencedCode {
        kind: FenceKind,
        lang: Option<String>,
    },
}

impl BlockKind {
    pub fn tag(&self) -> BlockTag {
        match self {
            BlockKind::Paragraph => BlockTag::Paragraph,
            BlockKind::Heading { .. } => BlockTag::Heading,
            BlockKind::FencedCode { .. } => BlockTag::Code,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, BlockKind::FencedCode { .. })
    }
}

/// Coarse block category, used by configuration allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    Paragraph,
    Heading,
    Code,
}

impl BlockTag {
    pub const ALL: [BlockTag; 3] = [BlockTag::Paragraph, BlockTag::Heading, BlockTag::Code];
}

/// A parsed block node with its containers, kind, spans and identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    /// The container stack this block is nested within.
    pub containers: Vec<ContainerFrame>,
    pub kind: BlockKind,
    /// Full byte span of the block including delimiters and terminator.
    pub span: Span,
    /// The block's meaningful text, excluding container prefixes, syntax
    /// markers and any block-id marker.
    pub content: ContentView,
    /// Persisted identity, when the block carries a ` ^id` marker.
    pub id: Option<BlockId>,
    /// Source span of the marker, separating whitespace included.
    pub id_marker: Option<Span>,
    /// Where a marker is inserted if the block has none yet.
    pub id_insert_at: usize,
}

impl BlockNode {
    /// Smallest span covering all of the block's content.
    pub fn content_span(&self) -> Span {
        self.content.bounds().unwrap_or(Span::new(self.span.start, self.span.start))
    }
}
