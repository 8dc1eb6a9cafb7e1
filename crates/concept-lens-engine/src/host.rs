//! The document capability the annotation engine depends on.
//!
//! Matching, resolution and selection linking only ever see blocks and their
//! text leaves through [`BlockProvider`]. [`Document`] is the markdown host.

use std::ops::Range;

use crate::editing::Document;
use crate::parsing::{
    blocks::{BlockId, BlockKind},
    inline::InlineNode,
    parse_inline_for_block,
    rope::{Span, slice::slice_to_string},
};

/// What a run of block text is, for matching purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Text,
    /// Inline code or fenced code. Never matched.
    Code,
    /// An inline mention marker (`[[target]]`). Never matched.
    MentionMarker,
}

impl LeafKind {
    pub fn is_matchable(self) -> bool {
        matches!(self, LeafKind::Text)
    }
}

/// A maximal run of a block's plain text with one [`LeafKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    /// Absolute document position of the first byte.
    pub start: usize,
    pub text: String,
    pub kind: LeafKind,
}

impl TextLeaf {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// A block as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRef {
    pub id: Option<BlockId>,
    pub kind: BlockKind,
    /// Absolute span of the whole block.
    pub span: Range<usize>,
}

pub trait BlockProvider {
    /// All blocks in document order.
    fn blocks(&self) -> Vec<BlockRef>;

    /// The block's text leaves in order. Their concatenation is the block's
    /// plain text.
    fn text_leaves(&self, block: &BlockRef) -> Vec<TextLeaf>;

    fn block(&self, id: &BlockId) -> Option<BlockRef> {
        self.blocks()
            .into_iter()
            .find(|b| b.id.as_ref() == Some(id))
    }
}

/// A block's plain text together with the leaves it was built from, for
/// mapping between plain-text offsets and absolute positions.
#[derive(Debug, Clone)]
pub struct BlockText {
    leaves: Vec<TextLeaf>,
    /// Plain-text offset at which each leaf starts.
    offsets: Vec<usize>,
    text: String,
}

impl BlockText {
    pub fn new(leaves: Vec<TextLeaf>) -> Self {
        let mut offsets = Vec::with_capacity(leaves.len());
        let mut text = String::new();
        for leaf in &leaves {
            offsets.push(text.len());
            text.push_str(&leaf.text);
        }
        Self {
            leaves,
            offsets,
            text,
        }
    }

    pub fn of<P: BlockProvider + ?Sized>(provider: &P, block: &BlockRef) -> Self {
        Self::new(provider.text_leaves(block))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn leaves(&self) -> &[TextLeaf] {
        &self.leaves
    }

    /// Plain-text ranges of leaves that must never be matched.
    pub fn unmatchable(&self) -> Vec<Range<usize>> {
        self.leaf_offsets()
            .filter(|(_, leaf)| !leaf.kind.is_matchable())
            .map(|(start, leaf)| start..start + leaf.text.len())
            .collect()
    }

    fn leaf_offsets(&self) -> impl Iterator<Item = (usize, &TextLeaf)> {
        self.offsets.iter().copied().zip(&self.leaves)
    }

    /// Maps a plain-text boundary to an absolute position.
    ///
    /// A start boundary belongs to the leaf it begins, an end boundary to the
    /// leaf it closes, so a range never maps across a leaf seam it does not
    /// touch.
    pub fn to_absolute(&self, offset: usize, is_end: bool) -> Option<usize> {
        self.leaf_offsets().find_map(|(plain_start, leaf)| {
            let plain_end = plain_start + leaf.text.len();
            let inside = if is_end {
                plain_start < offset && offset <= plain_end
            } else {
                plain_start <= offset && offset < plain_end
            };
            inside.then(|| leaf.start + (offset - plain_start))
        })
    }

    pub fn to_absolute_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        let start = self.to_absolute(range.start, false)?;
        let end = self.to_absolute(range.end, true)?;
        Some(start..end)
    }

    /// Maps an absolute position back to a plain-text offset.
    pub fn to_plain(&self, position: usize, is_end: bool) -> Option<usize> {
        self.leaf_offsets().find_map(|(plain_start, leaf)| {
            let inside = if is_end {
                leaf.start < position && position <= leaf.end()
            } else {
                leaf.start <= position && position < leaf.end()
            };
            inside.then(|| plain_start + (position - leaf.start))
        })
    }
}

impl BlockProvider for Document {
    fn blocks(&self) -> Vec<BlockRef> {
        self.block_nodes()
            .iter()
            .map(|b| BlockRef {
                id: b.id.clone(),
                kind: b.kind.clone(),
                span: b.span.range(),
            })
            .collect()
    }

    fn text_leaves(&self, block: &BlockRef) -> Vec<TextLeaf> {
        let Some(node) = self
            .block_nodes()
            .iter()
            .find(|b| b.span.range() == block.span)
        else {
            return vec![];
        };
        let rope = self.rope();
        let leaf = |span: Span, kind| TextLeaf {
            start: span.start,
            text: slice_to_string(rope, span),
            kind,
        };

        if node.kind.is_code() {
            return node
                .content
                .text_spans()
                .into_iter()
                .map(|span| leaf(span, LeafKind::Code))
                .collect();
        }
        parse_inline_for_block(rope, node)
            .into_iter()
            .map(|inline| match inline {
                InlineNode::Text(span) => leaf(span, LeafKind::Text),
                InlineNode::CodeSpan { full, .. } => leaf(full, LeafKind::Code),
                InlineNode::WikiLink { full, .. } => leaf(full, LeafKind::MentionMarker),
            })
            .collect()
    }
}
