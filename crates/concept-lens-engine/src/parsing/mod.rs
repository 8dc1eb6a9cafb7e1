pub mod blocks;
pub mod inline;
pub mod rope;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use blocks::{BlockBuilder, BlockId, BlockNode, MarkdownLineClassifier};
use rope::{lines_with_spans, slice::slice_to_string};

#[derive(Debug, Clone, Default)]
pub struct ParsedDoc {
    pub blocks: Vec<BlockNode>,
}

impl ParsedDoc {
    pub fn block_by_id(&self, id: &BlockId) -> Option<&BlockNode> {
        self.blocks.iter().find(|b| b.id.as_ref() == Some(id))
    }

    /// The block whose span contains `offset`.
    pub fn block_at(&self, offset: usize) -> Option<&BlockNode> {
        self.blocks
            .iter()
            .find(|b| b.span.start <= offset && offset < b.span.end)
    }
}

pub fn parse_document(rope: &Rope) -> ParsedDoc {
    let classifier = MarkdownLineClassifier;
    let mut builder = BlockBuilder::new();

    for lr in lines_with_spans(rope) {
        let lc = classifier.classify(&lr);
        builder.push(&lc);
    }

    ParsedDoc {
        blocks: builder.finish(),
    }
}

/// Inline parse of a block's text spans. Code blocks are raw and yield nothing.
pub fn parse_inline_for_block(rope: &Rope, b: &BlockNode) -> Vec<inline::InlineNode> {
    if b.kind.is_code() {
        return vec![];
    }
    b.content
        .text_spans()
        .into_iter()
        .flat_map(|span| inline::parse_inline(span.start, &slice_to_string(rope, span)))
        .collect()
}
