use crate::parsing::rope::span::Span;

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, WikiLink},
    types::InlineNode,
};

/// Parses inline content into a sequence of [`InlineNode`]s.
///
/// `base` is the byte offset in the rope where `s` begins. The returned nodes
/// cover the whole input: text between constructs is emitted as
/// `InlineNode::Text`.
pub fn parse_inline(base: usize, s: &str) -> Vec<InlineNode> {
    let mut cur = Cursor::new(s, base);
    let mut out = vec![];
    let mut text_start = cur.pos();

    fn flush_text(out: &mut Vec<InlineNode>, start: usize, end: usize) {
        if end > start {
            out.push(InlineNode::Text(Span { start, end }));
        }
    }

    while !cur.eof() {
        // Code spans first: they are raw zones.
        if cur.peek() == Some(CodeSpan::TICK) {
            match try_parse_code_span(&mut cur) {
                Some(node) => {
                    flush_text(&mut out, text_start, node.span().start);
                    text_start = node.span().end;
                    out.push(node);
                }
                // An unmatched backtick run is literal text.
                None => cur.bump_n(cur.run_len(CodeSpan::TICK)),
            }
            continue;
        }
        if let Some(node) = try_parse_wikilink(&mut cur) {
            flush_text(&mut out, text_start, node.span().start);
            text_start = node.span().end;
            out.push(node);
            continue;
        }
        cur.bump();
    }

    flush_text(&mut out, text_start, cur.pos());
    out
}

/// Parses a code span opened by the backtick run at the cursor.
///
/// On failure the cursor is restored.
fn try_parse_code_span(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    let width = cur.run_len(CodeSpan::TICK);
    if width == 0 {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(width);
    let inner_start = cur.pos();

    while !cur.eof() {
        let run = cur.run_len(CodeSpan::TICK);
        if run == width {
            let inner_end = cur.pos();
            cur.bump_n(run);
            return Some(InlineNode::CodeSpan {
                full: Span::new(start, cur.pos()),
                inner: Span::new(inner_start, inner_end),
            });
        }
        if run > 0 {
            cur.bump_n(run);
        } else {
            cur.bump();
        }
    }

    *cur = saved;
    None
}

/// Attempts to parse a wikilink starting at the current position.
///
/// Handles both `[[target]]` and `[[target|alias]]`. On failure the cursor is
/// restored.
fn try_parse_wikilink(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    if !cur.starts_with(WikiLink::OPEN) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(WikiLink::OPEN.len());
    let target_start = cur.pos();

    while !cur.eof() && cur.peek() != Some(WikiLink::ALIAS) && !cur.starts_with(WikiLink::CLOSE)
    {
        cur.bump();
    }
    let target = Span::new(target_start, cur.pos());

    let mut alias = None;
    if cur.peek() == Some(WikiLink::ALIAS) {
        cur.bump();
        let alias_start = cur.pos();
        while !cur.eof() && !cur.starts_with(WikiLink::CLOSE) {
            cur.bump();
        }
        alias = Some(Span::new(alias_start, cur.pos()));
    }

    if !cur.starts_with(WikiLink::CLOSE) {
        *cur = saved;
        return None;
    }
    cur.bump_n(WikiLink::CLOSE.len());

    Some(InlineNode::WikiLink {
        full: Span::new(start, cur.pos()),
        target,
        alias,
    })
}
