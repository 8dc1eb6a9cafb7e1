use std::{borrow::Cow, ops::Range};

use xi_rope::{
    Rope, RopeInfo,
    delta::{Builder, Transformer},
};

use crate::editing::{
    Cmd, Patch,
    commands::{EditError, changed_ranges, compile_command},
};
use crate::parsing::{ParsedDoc, blocks::BlockNode, parse_document};

/// The editable markdown document.
///
/// The xi-rope buffer is the single source of truth: saving writes its bytes
/// verbatim. Every content change re-parses the buffer into blocks; block
/// identity lives in the text itself as ` ^id` markers, so it survives edits
/// without any side table.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) buffer: Rope,
    pub(crate) selection: Range<usize>,
    /// Incremented on each applied command.
    pub(crate) version: u64,
    pub(crate) parsed: ParsedDoc,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let buffer = Rope::from(text);
        let len = buffer.len();
        let parsed = parse_document(&buffer);

        Ok(Self {
            buffer,
            selection: len..len,
            version: 0,
            parsed,
        })
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.text().into_bytes()
    }

    /// Apply a command: compile to a delta, update the buffer, re-parse and
    /// transform the selection.
    ///
    /// Invalid commands leave the document untouched.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        self.apply_with(cmd, true)
    }

    /// Apply an edit that adds markup next to the user's text, such as a
    /// block-id marker. Unlike [`Document::apply`], a caret stays in front
    /// of text inserted at it, so the next keystroke lands in the content
    /// and not in the markup.
    pub fn apply_markup(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        self.apply_with(cmd, false)
    }

    fn apply_with(&mut self, cmd: Cmd, caret_follows: bool) -> Result<Patch, EditError> {
        let delta = compile_command(self, &cmd)?;
        let changed = changed_ranges(&delta);

        self.buffer = delta.apply(&self.buffer);
        self.parsed = parse_document(&self.buffer);

        // A range never grows at either edge.
        let new_selection = {
            let mut transformer = Transformer::new(&delta);
            let (start_after, end_after) = if self.selection.is_empty() {
                (caret_follows, caret_follows)
            } else {
                (true, false)
            };
            let start = transformer.transform(self.selection.start, start_after);
            let end = transformer.transform(self.selection.end, end_after);
            start..end.max(start)
        };
        self.selection = new_selection.clone();
        self.version += 1;

        Ok(Patch {
            changed,
            new_selection,
            version: self.version,
            delta,
        })
    }

    /// Change the selection only. The returned patch carries an identity delta.
    pub fn select(&mut self, range: Range<usize>) -> Patch {
        self.set_selection(range);
        Patch {
            changed: vec![],
            new_selection: self.selection.clone(),
            version: self.version,
            delta: Builder::<RopeInfo>::new(self.len()).build(),
        }
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Set the selection, clamped to the document.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let len = self.len();
        let start = selection.start.min(len);
        self.selection = start..selection.end.clamp(start, len);
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    /// Parsed blocks in document order.
    pub fn block_nodes(&self) -> &[BlockNode] {
        &self.parsed.blocks
    }

    pub fn parsed(&self) -> &ParsedDoc {
        &self.parsed
    }

    /// Slice the buffer, clamping a stale range instead of panicking.
    pub fn slice_to_cow(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        self.buffer.slice_to_cow(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::BlockKind;

    #[test]
    fn test_document_from_bytes_valid_utf8() {
        let text = "# Hello World\n\nThis is a test document.";
        let doc = Document::from_bytes(text.as_bytes()).expect("valid UTF-8");

        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.selection(), text.len()..text.len());
        assert_eq!(doc.block_nodes().len(), 2);
        assert!(matches!(doc.block_nodes()[0].kind, BlockKind::Heading { level: 1 }));
    }

    #[test]
    fn test_document_from_bytes_invalid_utf8() {
        assert!(Document::from_bytes(&[0xFF, 0xFE, 0xFD]).is_err());
    }

    #[test]
    fn test_document_with_unicode_and_crlf() {
        let text = "Hello 世界! 🦀\r\n\r\nRust is great! 🎉";
        let doc = Document::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.block_nodes().len(), 2);
    }

    #[test]
    fn test_apply_reparses_blocks() {
        let mut doc = Document::from_bytes(b"one").unwrap();
        doc.apply(Cmd::InsertText {
            at: 3,
            text: "\n\n# two".to_string(),
        })
        .unwrap();
        assert_eq!(doc.block_nodes().len(), 2);
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_select_is_selection_only() {
        let mut doc = Document::from_bytes(b"Hello World").unwrap();
        let patch = doc.select(2..5);
        assert!(!patch.doc_changed());
        assert_eq!(patch.new_selection, 2..5);
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.text(), "Hello World");
    }

    #[test]
    fn test_selection_does_not_absorb_text_inserted_at_its_end() {
        let mut doc = Document::from_bytes(b"one two").unwrap();
        doc.select(4..7);
        doc.apply(Cmd::InsertText {
            at: 7,
            text: " ^id".to_string(),
        })
        .unwrap();
        assert_eq!(doc.selection(), 4..7);

        doc.select(7..7);
        doc.apply(Cmd::InsertText {
            at: 7,
            text: "!".to_string(),
        })
        .unwrap();
        assert_eq!(doc.selection(), 8..8);
    }

    #[test]
    fn test_markup_insert_leaves_caret_in_front() {
        let mut doc = Document::from_bytes(b"one").unwrap();
        doc.select(3..3);
        let patch = doc
            .apply_markup(Cmd::InsertText {
                at: 3,
                text: " ^id".to_string(),
            })
            .unwrap();
        assert_eq!(doc.selection(), 3..3);
        assert_eq!(patch.new_selection, 3..3);

        // Text before the caret still pushes it along.
        doc.apply_markup(Cmd::InsertText {
            at: 0,
            text: "> ".to_string(),
        })
        .unwrap();
        assert_eq!(doc.selection(), 5..5);
    }

    #[test]
    fn test_no_panic_on_stale_ranges() {
        let mut doc = Document::from_bytes(b"short").unwrap();
        doc.set_selection(3..100);
        assert_eq!(doc.selection(), 3..5);
        assert_eq!(doc.slice_to_cow(2..50), "ort");
        assert_eq!(doc.slice_to_cow(80..90), "");
    }
}
