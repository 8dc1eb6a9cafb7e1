use crate::parsing::rope::span::Span;

use super::{
    classify::LineClass,
    containers::ContainerPath,
    content::{ContentLine, ContentView},
    kinds::{BlockId, BlockIdMarker, CodeFence, FenceKind},
    open::{BlockOpen, try_open_leaf},
    types::{BlockKind, BlockNode},
};

/// A block-id marker located in the source: span plus parsed id.
type LocatedId = (Span, BlockId);

#[derive(Debug, Clone)]
enum LeafState {
    None,
    Paragraph {
        lines: Vec<ContentLine>,
        last_body: String,
    },
    Fence {
        kind: FenceKind,
        depth: u8,
        lang: Option<String>,
        opener: Span,
        marker: Option<LocatedId>,
        insert_at: usize,
        lines: Vec<ContentLine>,
        last_line_end: usize,
    },
}

pub struct BlockBuilder {
    containers: ContainerPath,
    leaf: LeafState,
    out: Vec<BlockNode>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            containers: ContainerPath::default(),
            leaf: LeafState::None,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        if self.in_fence() {
            self.consume_fence_line(c);
            return;
        }

        // A closing paragraph keeps the containers it was opened in.
        if c.is_blank {
            self.flush_paragraph();
            self.containers.set_blockquote_depth(c.quote_depth);
            return;
        }

        if let Some(open) = try_open_leaf(c) {
            self.flush_paragraph();
            self.containers.set_blockquote_depth(c.quote_depth);
            self.open_leaf(open, c);
            return;
        }

        if matches!(self.leaf, LeafState::None) {
            self.containers.set_blockquote_depth(c.quote_depth);
        }
        self.extend_paragraph(c);
    }

    pub fn finish(mut self) -> Vec<BlockNode> {
        self.flush_paragraph();
        self.flush_fence();
        self.out
    }

    fn in_fence(&self) -> bool {
        matches!(self.leaf, LeafState::Fence { .. })
    }

    fn open_leaf(&mut self, open: BlockOpen, c: &LineClass) {
        let body_start = c.remainder_span.start;
        let marker = BlockIdMarker::split_trailing(&c.remainder_text);
        let content_end = marker
            .as_ref()
            .map_or(c.remainder_span.end, |m| body_start + m.content_end);
        let located = marker.map(|m| {
            (
                Span::new(body_start + m.content_end, body_start + m.marker_end),
                m.id,
            )
        });

        match open {
            BlockOpen::FencedCode { kind } => {
                let opener_text = &c.remainder_text[..content_end - body_start];
                self.leaf = LeafState::Fence {
                    kind,
                    depth: c.quote_depth,
                    lang: CodeFence::lang(opener_text),
                    opener: c.line,
                    marker: located,
                    insert_at: content_end,
                    lines: vec![],
                    last_line_end: c.line.end,
                };
            }
            BlockOpen::Heading {
                level,
                content_offset,
            } => {
                let start = (body_start + content_offset).min(content_end);
                let content = ContentView::Contiguous(Span::new(start, content_end));
                self.emit(
                    BlockKind::Heading { level },
                    c.line,
                    content,
                    located,
                    content_end,
                );
            }
        }
    }

    fn consume_fence_line(&mut self, c: &LineClass) {
        let closes = match &mut self.leaf {
            LeafState::Fence {
                kind,
                last_line_end,
                ..
            } => {
                *last_line_end = c.line.end;
                CodeFence::closes(*kind, c.fence_sig)
            }
            _ => return,
        };
        if closes {
            self.flush_fence();
            return;
        }
        let LeafState::Fence { lines, depth, .. } = &mut self.leaf else {
            return;
        };

        // Code keeps its indentation unless a quote prefix had to be stripped.
        let start = if *depth == 0 {
            c.line.start
        } else {
            c.remainder_span.start
        };
        lines.push(ContentLine {
            raw_line: c.line,
            prefix: Span::new(c.line.start, start),
            content: Span::new(start, c.remainder_span.end),
        });
    }

    fn extend_paragraph(&mut self, c: &LineClass) {
        let line = ContentLine {
            raw_line: c.line,
            prefix: Span::new(c.line.start, c.remainder_span.start),
            content: c.remainder_span,
        };
        match &mut self.leaf {
            LeafState::Paragraph { lines, last_body } => {
                lines.push(line);
                last_body.clone_from(&c.remainder_text);
            }
            _ => {
                self.leaf = LeafState::Paragraph {
                    lines: vec![line],
                    last_body: c.remainder_text.clone(),
                };
            }
        }
    }

    fn flush_paragraph(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        let LeafState::Paragraph {
            mut lines,
            last_body,
        } = prev
        else {
            self.leaf = prev; // put back non-paragraph leaf (e.g. fence)
            return;
        };
        let (Some(first), Some(last)) = (lines.first().cloned(), lines.last_mut()) else {
            return;
        };

        let insert_at = last.content.end;
        let located = BlockIdMarker::split_trailing(&last_body).map(|m| {
            let base = last.content.start;
            last.content.end = base + m.content_end;
            (Span::new(base + m.content_end, base + m.marker_end), m.id)
        });
        let span = Span::new(first.raw_line.start, last.raw_line.end);
        let insert_at = if located.is_some() {
            last.content.end
        } else {
            insert_at
        };
        let content = Self::view_of(lines, span.start);
        self.emit(BlockKind::Paragraph, span, content, located, insert_at);
    }

    fn flush_fence(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Fence {
            kind,
            lang,
            depth: _,
            opener,
            marker,
            insert_at,
            lines,
            last_line_end,
        } = prev
        {
            // Unterminated fences run to EOF and are emitted anyway.
            let content = Self::view_of(lines, opener.end);
            self.emit(
                BlockKind::FencedCode { kind, lang },
                Span::new(opener.start, last_line_end),
                content,
                marker,
                insert_at,
            );
        }
    }

    fn view_of(lines: Vec<ContentLine>, empty_at: usize) -> ContentView {
        if lines.len() > 1 && lines.iter().any(|l| !l.prefix.is_empty()) {
            return ContentView::Lines(lines);
        }
        match (lines.first(), lines.last()) {
            (Some(first), Some(last)) => {
                ContentView::Contiguous(Span::new(first.content.start, last.content.end))
            }
            _ => ContentView::Contiguous(Span::new(empty_at, empty_at)),
        }
    }

    fn emit(
        &mut self,
        kind: BlockKind,
        span: Span,
        content: ContentView,
        marker: Option<LocatedId>,
        id_insert_at: usize,
    ) {
        let (id_marker, id) = marker.unzip();
        self.out.push(BlockNode {
            containers: self.containers.0.clone(),
            kind,
            span,
            content,
            id,
            id_marker,
            id_insert_at,
        });
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}
