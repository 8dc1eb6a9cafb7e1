//! Integration tests for the parsing module.


use pretty_assertions::assert_eq;
use xi_rope::Rope;

use crate::parsing::{
    ParsedDoc,
    blocks::{BlockId, BlockKind, ContainerFrame, ContentView, kinds::FenceKind},
    inline::InlineNode,
    parse_document, parse_inline_for_block,
    rope::span::Span,
};

fn parse(md: &str) -> (Rope, ParsedDoc) {
    let rope = Rope::from(md);
    let doc = parse_document(&rope);
    invariants::check(&rope, &doc.blocks);
    (rope, doc)
}

#[test]
fn empty_document() {
    let (_, doc) = parse("");
    assert!(doc.blocks.is_empty());
}

#[test]
fn blank_lines_only() {
    let (_, doc) = parse("\n\n\n");
    assert!(doc.blocks.is_empty());
}

#[test]
fn heading_with_id_marker() {
    let (rope, doc) = parse("# Title ^h1\n\nBody text\n");
    assert_eq!(doc.blocks.len(), 2);

    let h = &doc.blocks[0];
    assert_eq!(h.kind, BlockKind::Heading { level: 1 });
    assert_eq!(h.content, ContentView::Contiguous(Span::new(2, 7)));
    assert_eq!(h.id, BlockId::parse("h1"));
    assert_eq!(h.id_marker, Some(Span::new(7, 11)));
    assert_eq!(h.content.join_content(&rope), "Title");

    let p = &doc.blocks[1];
    assert_eq!(p.kind, BlockKind::Paragraph);
    assert_eq!(p.span, Span::new(13, 23));
    assert_eq!(p.id, None);
    assert_eq!(p.id_insert_at, 22);
}

#[test]
fn quoted_paragraph_spans_lines() {
    let (rope, doc) = parse("> one\n> two ^q\n");
    assert_eq!(doc.blocks.len(), 1);

    let b = &doc.blocks[0];
    assert_eq!(b.containers, vec![ContainerFrame::BlockQuote { depth: 1 }]);
    assert!(b.content.is_lines());
    assert_eq!(b.content.join_content(&rope), "one\ntwo");
    assert_eq!(b.id, BlockId::parse("q"));
    assert_eq!(b.id_marker, Some(Span::new(11, 14)));
    assert_eq!(b.content_span(), Span::new(2, 11));
}

#[test]
fn quote_containers_do_not_leak_into_next_block() {
    let (_, doc) = parse("> quoted\n\nplain\n");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(
        doc.blocks[0].containers,
        vec![ContainerFrame::BlockQuote { depth: 1 }]
    );
    assert!(doc.blocks[1].containers.is_empty());
}

#[test]
fn fence_with_lang_and_id() {
    let (rope, doc) = parse("```rust ^c1\nlet x = 1;\n```\n");
    assert_eq!(doc.blocks.len(), 1);

    let b = &doc.blocks[0];
    assert_eq!(
        b.kind,
        BlockKind::FencedCode {
            kind: FenceKind::Backticks,
            lang: Some("rust".to_string()),
        }
    );
    assert_eq!(b.span, Span::new(0, 27));
    assert_eq!(b.id_marker, Some(Span::new(7, 11)));
    assert_eq!(b.content.join_content(&rope), "let x = 1;");
    assert!(parse_inline_for_block(&rope, b).is_empty());
}

#[test]
fn unterminated_fence_runs_to_eof() {
    let (rope, doc) = parse("para\n~~~\ncode\nmore");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(doc.blocks[1].span, Span::new(5, 18));
    assert_eq!(doc.blocks[1].content.join_content(&rope), "code\nmore");
}

#[test]
fn empty_fence_has_empty_content() {
    let (rope, doc) = parse("```\n```\n");
    assert_eq!(doc.blocks.len(), 1);
    assert!(doc.blocks[0].content.text_spans().is_empty());
    assert_eq!(doc.blocks[0].content.join_content(&rope), "");
}

#[test]
fn heading_interrupts_paragraph() {
    let (_, doc) = parse("line one\n## Next\nline two\n");
    let kinds: Vec<_> = doc.blocks.iter().map(|b| b.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::Paragraph,
            BlockKind::Heading { level: 2 },
            BlockKind::Paragraph,
        ]
    );
}

#[test]
fn caret_in_middle_line_stays_text() {
    let (rope, doc) = parse("first ^a\nsecond\n");
    let b = &doc.blocks[0];
    assert_eq!(b.id, None);
    assert_eq!(b.content.join_content(&rope), "first ^a\nsecond");
}

#[test]
fn raw_zones_suppress_inline_parsing() {
    let (rope, doc) = parse("`[[not a link]]`");
    let inlines = parse_inline_for_block(&rope, &doc.blocks[0]);
    assert_eq!(inlines.len(), 1);
    assert!(matches!(inlines[0], InlineNode::CodeSpan { .. }));
}

#[test]
fn inline_offsets_are_absolute() {
    let (rope, doc) = parse("intro\n\n> see [[Rust]]\n> too\n");
    let inlines = parse_inline_for_block(&rope, &doc.blocks[1]);
    let links: Vec<Span> = inlines
        .iter()
        .filter_map(|n| match n {
            InlineNode::WikiLink { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    assert_eq!(links, vec![Span::new(15, 19)]);
    assert_eq!(rope.slice_to_cow(15..19), "Rust");
}

#[test]
fn lookup_by_id_and_offset() {
    let (_, doc) = parse("alpha ^a1\n\nbeta\n");
    let id = BlockId::parse("a1").unwrap();
    assert_eq!(doc.block_by_id(&id).map(|b| b.span.start), Some(0));
    assert_eq!(doc.block_at(12).map(|b| b.span.start), Some(11));
    assert!(doc.block_at(10).is_none());
}

#[test]
fn mixed_document_invariants() {
    let md = "# Head\n\n> quote ^q1\n> > nested\n\n```\n> not quote\n```\n\ntext with `code` and [[link]] ^p\n";
    let (_, doc) = parse(md);
    assert_eq!(doc.blocks.len(), 4);
}
