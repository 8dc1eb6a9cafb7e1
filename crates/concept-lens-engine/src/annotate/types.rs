use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

use crate::editing::Patch;
use crate::parsing::blocks::BlockId;

/// Reference to an external entity (a concept).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectRef(pub String);

impl SubjectRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(pub String);

impl AnchorId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored mention: a span of one block's plain text linked to a subject.
///
/// Offsets are UTF-8 byte offsets into the block's plain text as it was when
/// the anchor was created. Nothing guarantees they still fit after edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub anchor_id: AnchorId,
    pub block_id: BlockId,
    pub start_offset: usize,
    pub end_offset: usize,
    pub surface_text: String,
    pub subject: SubjectRef,
}

/// An anchor that has not been handed to a mention store yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnchor {
    pub block_id: BlockId,
    pub start_offset: usize,
    pub end_offset: usize,
    pub surface_text: String,
    pub subject: SubjectRef,
}

impl NewAnchor {
    pub fn with_id(self, anchor_id: AnchorId) -> Anchor {
        Anchor {
            anchor_id,
            block_id: self.block_id,
            start_offset: self.start_offset,
            end_offset: self.end_offset,
            surface_text: self.surface_text,
            subject: self.subject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub name: String,
    pub subject: SubjectRef,
}

impl VocabularyEntry {
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: SubjectRef(subject.into()),
        }
    }
}

/// Terms a pass matches against. Shared behind an `Arc` and replaced
/// wholesale, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

impl Vocabulary {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VocabularyEntry> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = VocabularyEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Stored offsets still point at the expected text.
    Ok,
    /// Found again by searching for the surface text.
    Repaired,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Ok => f.write_str("ok"),
            MatchStatus::Repaired => f.write_str("repaired"),
        }
    }
}

/// A highlighted range in absolute document positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchRange {
    pub range: Range<usize>,
    pub subject: SubjectRef,
    pub status: MatchStatus,
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Ordered, non-overlapping match ranges of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    ranges: Vec<MatchRange>,
}

impl DecorationSet {
    pub const fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Builds a set from arbitrary ranges. Empty ranges are dropped; on
    /// overlap the earlier-starting (then longer) range is kept.
    pub fn from_ranges(mut ranges: Vec<MatchRange>) -> Self {
        ranges.retain(|m| m.range.start < m.range.end);
        ranges.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(b.range.end.cmp(&a.range.end))
        });
        let mut kept: Vec<MatchRange> = Vec::with_capacity(ranges.len());
        for m in ranges {
            if kept.last().is_some_and(|last| overlaps(&last.range, &m.range)) {
                continue;
            }
            kept.push(m);
        }
        Self { ranges: kept }
    }

    pub fn ranges(&self) -> &[MatchRange] {
        &self.ranges
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether any decoration shares a position with `range`.
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        // Ranges are sorted and disjoint, so ends are sorted too.
        let first = self.ranges.partition_point(|m| m.range.end <= range.start);
        self.ranges
            .get(first)
            .is_some_and(|m| overlaps(&m.range, range))
    }

    /// Moves every range through `patch`; ranges whose text was deleted are
    /// dropped.
    pub fn remap(&self, patch: &Patch) -> Self {
        let mut mapper = patch.mapper();
        let ranges = self
            .ranges
            .iter()
            .filter_map(|m| {
                mapper.map(m.range.clone()).map(|range| MatchRange {
                    range,
                    subject: m.subject.clone(),
                    status: m.status,
                })
            })
            .collect();
        Self { ranges }
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a MatchRange;
    type IntoIter = std::slice::Iter<'a, MatchRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
