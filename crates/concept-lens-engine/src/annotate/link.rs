//! Turning a user selection into an anchor.

use std::ops::Range;

use thiserror::Error;

use super::types::{NewAnchor, SubjectRef};
use crate::host::{BlockProvider, BlockText};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("selection is empty")]
    EmptySelection,
    #[error("selection does not start inside block text")]
    OutsideBlock,
    #[error("selection spans more than one block")]
    SpansBlocks,
    #[error("block has no id yet")]
    BlockWithoutId,
}

/// Builds an anchor for an absolute `selection` inside one identified block.
///
/// Offsets are taken relative to the block's plain text, which is what the
/// resolver reads back later.
pub fn anchor_from_selection<P: BlockProvider + ?Sized>(
    provider: &P,
    selection: Range<usize>,
    subject: SubjectRef,
) -> Result<NewAnchor, LinkError> {
    if selection.start >= selection.end {
        return Err(LinkError::EmptySelection);
    }

    let block = provider
        .blocks()
        .into_iter()
        .find(|b| b.span.start <= selection.start && selection.start < b.span.end)
        .ok_or(LinkError::OutsideBlock)?;
    if selection.end > block.span.end {
        return Err(LinkError::SpansBlocks);
    }
    let block_id = block.id.clone().ok_or(LinkError::BlockWithoutId)?;

    let text = BlockText::of(provider, &block);
    let start = text
        .to_plain(selection.start, false)
        .ok_or(LinkError::OutsideBlock)?;
    let end = text
        .to_plain(selection.end, true)
        .ok_or(LinkError::OutsideBlock)?;
    let surface = text
        .text()
        .get(start..end)
        .filter(|s| !s.is_empty())
        .ok_or(LinkError::OutsideBlock)?;

    Ok(NewAnchor {
        block_id,
        start_offset: start,
        end_offset: end,
        surface_text: surface.to_string(),
        subject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::resolver::{RepairPolicy, resolve};
    use crate::annotate::types::{AnchorId, MatchStatus};
    use crate::editing::Document;
    use crate::parsing::blocks::BlockId;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn doc(md: &str) -> Document {
        Document::from_bytes(md.as_bytes()).unwrap()
    }

    #[test]
    fn anchor_round_trips_through_resolver() {
        let d = doc("first ^f\n\n> quoted\n> text here ^q\n");
        let start = d.text().find("here").unwrap();
        let new = anchor_from_selection(&d, start..start + 4, SubjectRef::new("c:here")).unwrap();

        assert_eq!(new.block_id, BlockId::parse("q").unwrap());
        assert_eq!(new.surface_text, "here");
        assert_eq!((new.start_offset, new.end_offset), (12, 16));

        let anchor = new.with_id(AnchorId::generate());
        let resolved = resolve(&anchor, &d, RepairPolicy::default()).unwrap();
        assert_eq!(resolved.range, start..start + 4);
        assert_eq!(resolved.status, MatchStatus::Ok);
    }

    #[rstest]
    #[case(3..3, LinkError::EmptySelection)]
    #[case(0..12, LinkError::SpansBlocks)]
    #[case(12..15, LinkError::BlockWithoutId)]
    #[case(8..9, LinkError::OutsideBlock)]
    fn rejected_selections(#[case] selection: Range<usize>, #[case] expected: LinkError) {
        let d = doc("first ^f\n\nsecond\n");
        assert_eq!(
            anchor_from_selection(&d, selection, SubjectRef::new("c")),
            Err(expected)
        );
    }
}
