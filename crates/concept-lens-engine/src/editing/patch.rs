use std::ops::Range;

use xi_rope::{Delta, RopeInfo, delta::Transformer};

/// Result of applying a command or a selection change.
#[derive(Debug, Clone)]
pub struct Patch {
    /// Byte ranges of inserted text, in post-edit coordinates.
    pub changed: Vec<Range<usize>>,
    pub new_selection: Range<usize>,
    pub version: u64,
    /// Position-shift function of the edit. Identity for selection-only patches.
    pub delta: Delta<RopeInfo>,
}

impl Patch {
    /// Whether the edit changed document content (as opposed to selection only).
    pub fn doc_changed(&self) -> bool {
        !self.delta.is_identity()
    }

    /// A mapper that moves pre-edit ranges to post-edit positions.
    pub fn mapper(&self) -> RangeMapper<'_> {
        RangeMapper {
            transformer: Transformer::new(&self.delta),
        }
    }
}

/// Maps ranges through one edit's delta.
pub struct RangeMapper<'a> {
    transformer: Transformer<'a, RopeInfo>,
}

impl RangeMapper<'_> {
    /// Maps `range` through the edit. Text inserted exactly at either edge
    /// stays outside the range. Returns `None` when the range collapses.
    pub fn map(&mut self, range: Range<usize>) -> Option<Range<usize>> {
        let start = self.transformer.transform(range.start, true);
        let end = self.transformer.transform(range.end, false);
        (start < end).then_some(start..end)
    }
}
