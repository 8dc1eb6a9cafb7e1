//! Block identity assignment.
//!
//! Eligible blocks without a ` ^id` marker receive a fresh random id, written
//! into the document text so it persists with the file. Copy-pasted blocks
//! that repeat an earlier id get their marker replaced, keeping ids unique.

use std::{collections::HashSet, ops::Range};

use crate::editing::{Cmd, Document, EditError, Patch};
use crate::parsing::blocks::{BlockId, BlockIdMarker, BlockTag};

/// Gives every eligible block a unique persisted id.
///
/// Returns the patch of the id insertions, or `None` when every eligible
/// block already had a unique id. Running it twice in a row is a no-op the
/// second time.
pub fn assign_missing_ids(doc: &mut Document, eligible: &[BlockTag]) -> Option<Patch> {
    let mut seen = HashSet::new();
    let mut edits: Vec<(Range<usize>, String)> = vec![];

    for block in doc.block_nodes() {
        if !eligible.contains(&block.kind.tag()) {
            continue;
        }
        match (&block.id, block.id_marker) {
            (Some(id), _) if seen.insert(id.clone()) => {}
            (Some(_), Some(marker)) => {
                let fresh = BlockId::generate();
                edits.push((marker.range(), BlockIdMarker::render(&fresh)));
            }
            _ => {
                let fresh = BlockId::generate();
                let at = block.id_insert_at;
                edits.push((at..at, BlockIdMarker::render(&fresh)));
            }
        }
    }

    if edits.is_empty() {
        return None;
    }
    log::debug!("assigning {} block ids", edits.len());
    match doc.apply_markup(Cmd::ReplaceMany { edits }) {
        Ok(patch) => Some(patch),
        Err(err) => {
            log::warn!("block id assignment skipped: {err}");
            None
        }
    }
}

/// Rejects a command that would change an existing id in place.
///
/// Ids live in the text, so typing into a marker, appending id characters
/// right after it, or deleting only part of it silently renames the block and
/// orphans its anchors. Edits that remove a whole marker, or insert in front
/// of it, are allowed.
pub fn check_ids_kept(doc: &Document, cmd: &Cmd) -> Result<(), EditError> {
    let markers: Vec<(Range<usize>, &BlockId)> = doc
        .block_nodes()
        .iter()
        .filter_map(|b| Some((b.id_marker?.range(), b.id.as_ref()?)))
        .collect();
    if markers.is_empty() {
        return Ok(());
    }

    for (edit, text) in cmd.edits() {
        for (marker, id) in &markers {
            if rewrites_marker(doc, marker, &edit, text) {
                return Err(EditError::TouchesBlockId {
                    at: edit.start,
                    id: (*id).clone(),
                });
            }
        }
    }
    Ok(())
}

fn rewrites_marker(
    doc: &Document,
    marker: &Range<usize>,
    edit: &Range<usize>,
    text: &str,
) -> bool {
    let body = doc.slice_to_cow(marker.clone());
    let Some(sigil) = body.rfind(BlockIdMarker::SIGIL) else {
        return false;
    };
    // The sigil and id characters; the rest of the marker is whitespace.
    let id = marker.start + sigil..marker.end;

    let overlaps = edit.start < id.end && id.start < edit.end;
    let covers = edit.start <= id.start && id.end <= edit.end;
    if covers {
        return false;
    }
    if overlaps {
        return true;
    }

    // The sigil must stay separated from the content by whitespace.
    if edit.end == id.start {
        let separated = match text.chars().next_back() {
            Some(c) => c.is_whitespace(),
            None => edit.start > marker.start,
        };
        if !separated {
            return true;
        }
    }

    // Whatever ends up right behind the id must not extend it.
    if edit.start == id.end {
        let next = match text.chars().next() {
            Some(c) => Some(c),
            None if edit.end <= doc.len() && doc.rope().is_codepoint_boundary(edit.end) => doc
                .rope()
                .iter_chunks(edit.end..doc.len())
                .flat_map(str::chars)
                .next(),
            None => None,
        };
        return next.is_some_and(BlockIdMarker::is_id_char);
    }
    false
}
