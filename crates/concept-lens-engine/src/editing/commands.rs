use std::ops::Range;

use thiserror::Error;
use xi_rope::delta::{Builder, DeltaElement};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;
use crate::parsing::blocks::BlockId;

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: Range<usize>,
    },
    ReplaceRange {
        range: Range<usize>,
        text: String,
    },
    /// Several replacements applied atomically. Ranges refer to the
    /// pre-edit document and must not overlap.
    ReplaceMany {
        edits: Vec<(Range<usize>, String)>,
    },
}

impl Cmd {
    /// The replacements this command makes, in pre-edit coordinates.
    pub fn edits(&self) -> Vec<(Range<usize>, &str)> {
        match self {
            Cmd::InsertText { at, text } => vec![(*at..*at, text.as_str())],
            Cmd::DeleteRange { range } => vec![(range.clone(), "")],
            Cmd::ReplaceRange { range, text } => vec![(range.clone(), text.as_str())],
            Cmd::ReplaceMany { edits } => edits
                .iter()
                .map(|(range, text)| (range.clone(), text.as_str()))
                .collect(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("range {start}..{end} is outside the document (len {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
    #[error("edits overlap at offset {0}")]
    OverlappingEdits(usize),
    #[error("edit at offset {at} would rewrite the id of block {id}")]
    TouchesBlockId { at: usize, id: BlockId },
}

/// Compile a command into a delta
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Result<Delta<RopeInfo>, EditError> {
    let mut edits = cmd.edits();
    edits.sort_by_key(|(range, _)| (range.start, range.end));

    let mut builder = Builder::new(doc.len());
    let mut last_end = 0;
    for (range, text) in edits {
        check_range(doc, &range)?;
        if range.start < last_end {
            return Err(EditError::OverlappingEdits(range.start));
        }
        last_end = range.end;
        if text.is_empty() {
            if !range.is_empty() {
                builder.delete(range);
            }
        } else {
            builder.replace(range, Rope::from(text));
        }
    }
    Ok(builder.build())
}

fn check_range(doc: &Document, range: &Range<usize>) -> Result<(), EditError> {
    let len = doc.len();
    if range.start > range.end || range.end > len {
        return Err(EditError::OutOfBounds {
            start: range.start,
            end: range.end,
            len,
        });
    }
    for offset in [range.start, range.end] {
        if !doc.buffer.is_codepoint_boundary(offset) {
            return Err(EditError::NotCharBoundary(offset));
        }
    }
    Ok(())
}

/// Byte ranges of inserted text in post-edit coordinates.
pub(crate) fn changed_ranges(delta: &Delta<RopeInfo>) -> Vec<Range<usize>> {
    let mut changed = Vec::new();
    let mut cursor = 0;
    for op in &delta.els {
        match op {
            DeltaElement::Copy(from, to) => cursor += to - from,
            DeltaElement::Insert(inserted) => {
                let start = cursor;
                cursor += inserted.len();
                changed.push(start..cursor);
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;

    #[test]
    fn test_insert_text_at_beginning() {
        let mut doc = Document::from_bytes(b"Hello World").unwrap();
        doc.set_selection(0..0);

        let patch = doc
            .apply(Cmd::InsertText {
                at: 0,
                text: "Start: ".to_string(),
            })
            .unwrap();

        assert_eq!(doc.text(), "Start: Hello World");
        assert_eq!(patch.version, 1);
        assert_eq!(patch.changed, vec![0..7]);
        assert_eq!(patch.new_selection, 7..7);
        assert!(patch.doc_changed());
    }

    #[test]
    fn test_insert_text_in_middle() {
        let mut doc = Document::from_bytes(b"Hello World").unwrap();
        doc.set_selection(5..5);

        let patch = doc
            .apply(Cmd::InsertText {
                at: 5,
                text: " Beautiful".to_string(),
            })
            .unwrap();

        assert_eq!(doc.text(), "Hello Beautiful World");
        assert_eq!(patch.changed, vec![5..15]);
        assert_eq!(patch.new_selection, 15..15);
    }

    #[test]
    fn test_delete_range_shifts_selection() {
        let mut doc = Document::from_bytes(b"Hello Beautiful World").unwrap();
        doc.set_selection(16..21);

        let patch = doc.apply(Cmd::DeleteRange { range: 5..15 }).unwrap();

        assert_eq!(doc.text(), "Hello World");
        assert!(patch.changed.is_empty());
        assert_eq!(patch.new_selection, 6..11);
    }

    #[test]
    fn test_replace_range() {
        let mut doc = Document::from_bytes(b"Hello World").unwrap();
        let patch = doc
            .apply(Cmd::ReplaceRange {
                range: 6..11,
                text: "Rust".to_string(),
            })
            .unwrap();
        assert_eq!(doc.text(), "Hello Rust");
        assert_eq!(patch.changed, vec![6..10]);
    }

    #[test]
    fn test_replace_many_is_atomic_and_order_independent() {
        let mut doc = Document::from_bytes(b"one two three").unwrap();
        let patch = doc
            .apply(Cmd::ReplaceMany {
                edits: vec![(13..13, "!".to_string()), (0..3, "1".to_string())],
            })
            .unwrap();
        assert_eq!(doc.text(), "1 two three!");
        assert_eq!(patch.changed, vec![0..1, 11..12]);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let mut doc = Document::from_bytes(b"abcdef").unwrap();
        let err = doc
            .apply(Cmd::ReplaceMany {
                edits: vec![(0..3, "x".to_string()), (2..4, "y".to_string())],
            })
            .unwrap_err();
        assert_eq!(err, EditError::OverlappingEdits(2));
        assert_eq!(doc.text(), "abcdef");
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_out_of_bounds_and_char_boundary() {
        let mut doc = Document::from_bytes("héllo".as_bytes()).unwrap();
        assert!(matches!(
            doc.apply(Cmd::DeleteRange { range: 2..40 }),
            Err(EditError::OutOfBounds { .. })
        ));
        assert_eq!(
            doc.apply(Cmd::InsertText {
                at: 2,
                text: "x".to_string()
            })
            .unwrap_err(),
            EditError::NotCharBoundary(2)
        );
    }
}
