//! Resolution of stored anchors back to live document ranges.
//!
//! An anchor resolves at its stored offsets when the block text there still
//! reads as the surface text. Otherwise the surface text is searched for in
//! the block and the hit is reported as [`MatchStatus::Repaired`]. Anchors
//! whose block is gone, or whose text no longer appears, do not resolve.

use std::{collections::HashMap, ops::Range};

use serde::{Deserialize, Serialize};

use super::types::{Anchor, MatchRange, MatchStatus};
use crate::host::{BlockProvider, BlockText};
use crate::parsing::blocks::BlockId;

/// Which occurrence a repaired anchor snaps to when its surface text
/// appears more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairPolicy {
    /// The first occurrence in the block.
    #[default]
    FirstOccurrence,
    /// The occurrence starting closest to the stored start offset. Ties go
    /// to the earlier occurrence.
    NearestToOriginal,
}

/// Resolves one anchor against the current document.
pub fn resolve<P: BlockProvider + ?Sized>(
    anchor: &Anchor,
    provider: &P,
    policy: RepairPolicy,
) -> Option<MatchRange> {
    if anchor.surface_text.is_empty() {
        return None;
    }
    let block = provider.block(&anchor.block_id)?;
    resolve_in(anchor, &BlockText::of(provider, &block), policy)
}

/// Resolves many anchors, reading each referenced block once.
pub fn resolve_all<P: BlockProvider + ?Sized>(
    anchors: &[Anchor],
    provider: &P,
    policy: RepairPolicy,
) -> Vec<MatchRange> {
    // A duplicated id refers to its first block, as in `BlockProvider::block`.
    let mut texts: HashMap<BlockId, BlockText> = HashMap::new();
    for block in provider.blocks() {
        let Some(id) = block.id.clone() else {
            continue;
        };
        if anchors.iter().any(|a| a.block_id == id) {
            texts
                .entry(id)
                .or_insert_with(|| BlockText::of(provider, &block));
        }
    }

    anchors
        .iter()
        .filter(|a| !a.surface_text.is_empty())
        .filter_map(|a| {
            let resolved = resolve_in(a, texts.get(&a.block_id)?, policy);
            if resolved.is_none() {
                log::debug!("anchor {} does not resolve", a.anchor_id);
            }
            resolved
        })
        .collect()
}

fn resolve_in(anchor: &Anchor, text: &BlockText, policy: RepairPolicy) -> Option<MatchRange> {
    let (range, status) = locate(text.text(), anchor, policy)?;
    Some(MatchRange {
        range: text.to_absolute_range(range)?,
        subject: anchor.subject.clone(),
        status,
    })
}

/// Finds the anchor's span in `text`, relative to `text`.
pub fn locate(
    text: &str,
    anchor: &Anchor,
    policy: RepairPolicy,
) -> Option<(Range<usize>, MatchStatus)> {
    let surface = anchor.surface_text.as_str();
    if surface.is_empty() {
        return None;
    }

    let stored = anchor.start_offset..anchor.end_offset;
    if stored.start < stored.end && text.get(stored.clone()) == Some(surface) {
        return Some((stored, MatchStatus::Ok));
    }

    let start = match policy {
        RepairPolicy::FirstOccurrence => text.find(surface),
        RepairPolicy::NearestToOriginal => text
            .match_indices(surface)
            .map(|(i, _)| i)
            .min_by_key(|i| i.abs_diff(anchor.start_offset)),
    }?;
    Some((start..start + surface.len(), MatchStatus::Repaired))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::types::{AnchorId, SubjectRef};
    use crate::editing::Document;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn anchor(block: &str, start: usize, end: usize, surface: &str) -> Anchor {
        Anchor {
            anchor_id: AnchorId("a".to_string()),
            block_id: BlockId::parse(block).unwrap(),
            start_offset: start,
            end_offset: end,
            surface_text: surface.to_string(),
            subject: SubjectRef::new("concept:aaa"),
        }
    }

    #[test]
    fn exact_offsets_resolve_ok() {
        let doc = Document::from_bytes(b"intro AAA outro ^b1\n").unwrap();
        let m = resolve(&anchor("b1", 6, 9, "AAA"), &doc, RepairPolicy::default()).unwrap();
        assert_eq!(m.range, 6..9);
        assert_eq!(m.status, MatchStatus::Ok);
    }

    #[test]
    fn duplicated_id_resolves_in_first_block() {
        let doc = Document::from_bytes(b"AAA one ^dup\n\ntwo AAA ^dup\n").unwrap();
        let a = anchor("dup", 0, 3, "AAA");

        let single = resolve(&a, &doc, RepairPolicy::default()).unwrap();
        assert_eq!(single.range, 0..3);
        assert_eq!(single.status, MatchStatus::Ok);
        assert_eq!(
            resolve_all(std::slice::from_ref(&a), &doc, RepairPolicy::default()),
            vec![single]
        );
    }

    #[test]
    fn shifted_text_is_repaired() {
        let doc = Document::from_bytes(b"intro WXYZ AAA outro ^b1\n").unwrap();
        let m = resolve(&anchor("b1", 6, 9, "AAA"), &doc, RepairPolicy::default()).unwrap();
        assert_eq!(m.range, 11..14);
        assert_eq!(m.status, MatchStatus::Repaired);
    }

    #[rstest]
    #[case(RepairPolicy::FirstOccurrence, 0..3)]
    #[case(RepairPolicy::NearestToOriginal, 12..15)]
    fn duplicate_surface_text(#[case] policy: RepairPolicy, #[case] expected: Range<usize>) {
        let text = "AAA and the AAA";
        let a = anchor("b1", 11, 14, "AAA");
        let first = locate(text, &a, policy);
        assert_eq!(first, Some((expected, MatchStatus::Repaired)));
        assert_eq!(locate(text, &a, policy), first);
    }

    #[rstest]
    #[case(40, 43)]
    #[case(5, 2)]
    #[case(3, 3)]
    fn malformed_offsets_take_repair_path(#[case] start: usize, #[case] end: usize) {
        let a = anchor("b1", start, end, "AAA");
        assert_eq!(
            locate("xx AAA", &a, RepairPolicy::default()),
            Some((3..6, MatchStatus::Repaired))
        );
    }

    #[test]
    fn offsets_off_char_boundary_take_repair_path() {
        let a = anchor("b1", 1, 3, "é");
        assert_eq!(
            locate("aé é", &a, RepairPolicy::default()),
            Some((1..3, MatchStatus::Ok))
        );
        let a = anchor("b1", 2, 4, "é");
        assert_eq!(
            locate("aé é", &a, RepairPolicy::default()),
            Some((1..3, MatchStatus::Repaired))
        );
    }

    #[test]
    fn missing_block_or_text_does_not_resolve() {
        let doc = Document::from_bytes(b"something else ^b1\n").unwrap();
        assert_eq!(resolve(&anchor("b1", 0, 3, "AAA"), &doc, RepairPolicy::default()), None);
        assert_eq!(resolve(&anchor("zz", 0, 3, "som"), &doc, RepairPolicy::default()), None);
        assert_eq!(resolve(&anchor("b1", 0, 0, ""), &doc, RepairPolicy::default()), None);
    }

    #[test]
    fn case_sensitive_search() {
        let a = anchor("b1", 0, 3, "AAA");
        assert_eq!(locate("aaa", &a, RepairPolicy::default()), None);
    }

    #[test]
    fn resolve_all_skips_unresolvable() {
        let doc = Document::from_bytes(b"> quoted AAA\n> and BBB ^q\n").unwrap();
        let anchors = vec![
            anchor("q", 7, 10, "AAA"),
            anchor("q", 0, 3, "BBB"),
            anchor("q", 0, 3, "CCC"),
            anchor("gone", 0, 3, "AAA"),
        ];
        let found = resolve_all(&anchors, &doc, RepairPolicy::default());
        let ranges: Vec<_> = found.iter().map(|m| (m.range.clone(), m.status)).collect();
        assert_eq!(
            ranges,
            vec![(9..12, MatchStatus::Ok), (19..22, MatchStatus::Repaired)]
        );
        assert_eq!(doc.slice_to_cow(19..22), "BBB");
    }
}
