//! The three annotation passes and the inputs they read.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use super::matcher::TermMatcher;
use super::resolver::{RepairPolicy, resolve_all};
use super::types::{Anchor, DecorationSet, MatchRange, MatchStatus, Vocabulary};
use crate::host::{BlockProvider, BlockText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassName {
    /// Stored anchors resolved back into the document.
    Mentions,
    /// Terms from the concept vocabulary.
    KnownTerms,
    /// Candidate terms not already covered by a mention or known term.
    HeuristicTerms,
}

impl PassName {
    /// Every pass, in the order they run.
    pub const ALL: [PassName; 3] = [
        PassName::Mentions,
        PassName::KnownTerms,
        PassName::HeuristicTerms,
    ];

    /// This pass and every pass whose exclusion zones depend on it.
    pub fn with_downstream(self) -> &'static [PassName] {
        match self {
            PassName::Mentions => &Self::ALL,
            PassName::KnownTerms => &Self::ALL[1..],
            PassName::HeuristicTerms => &Self::ALL[2..],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PassName::Mentions => "mentions",
            PassName::KnownTerms => "known_terms",
            PassName::HeuristicTerms => "heuristic_terms",
        }
    }
}

impl fmt::Display for PassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the passes read besides the document itself.
///
/// Inputs are replaced wholesale. A pass notices a new input by pointer
/// identity of its `Arc`, so cloning `PassInputs` and handing the clone back
/// invalidates nothing.
#[derive(Debug, Clone, Default)]
pub struct PassInputs {
    pub anchors: Arc<[Anchor]>,
    pub known: Arc<Vocabulary>,
    pub heuristic: Arc<Vocabulary>,
}

impl PassInputs {
    pub fn new(anchors: Vec<Anchor>, known: Vocabulary, heuristic: Vocabulary) -> Self {
        Self {
            anchors: anchors.into(),
            known: Arc::new(known),
            heuristic: Arc::new(heuristic),
        }
    }
}

pub fn compute_mentions<P: BlockProvider + ?Sized>(
    provider: &P,
    anchors: &[Anchor],
    policy: RepairPolicy,
) -> DecorationSet {
    DecorationSet::from_ranges(resolve_all(anchors, provider, policy))
}

/// Matches `matcher` against every block's plain text.
///
/// Code, mention markers and anything overlapping one of `excluded` never
/// match.
pub fn compute_terms<P: BlockProvider + ?Sized>(
    provider: &P,
    matcher: &TermMatcher,
    excluded: &[&DecorationSet],
) -> DecorationSet {
    if matcher.is_empty() {
        return DecorationSet::empty();
    }

    let mut found = vec![];
    for block in provider.blocks() {
        if block.kind.is_code() {
            continue;
        }
        let text = BlockText::of(provider, &block);
        let unmatchable = text.unmatchable();

        let matches = matcher.find(text.text(), |range| {
            if unmatchable
                .iter()
                .any(|u| u.start < range.end && range.start < u.end)
            {
                return true;
            }
            match text.to_absolute_range(range.clone()) {
                Some(abs) => excluded.iter().any(|set| set.overlaps(&abs)),
                None => true,
            }
        });

        found.extend(matches.into_iter().filter_map(|m| {
            Some(MatchRange {
                range: text.to_absolute_range(m.range)?,
                subject: m.subject,
                status: MatchStatus::Ok,
            })
        }));
    }
    DecorationSet::from_ranges(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::types::{AnchorId, SubjectRef, VocabularyEntry};
    use crate::editing::Document;
    use crate::parsing::blocks::BlockId;
    use pretty_assertions::assert_eq;

    fn doc(md: &str) -> Document {
        Document::from_bytes(md.as_bytes()).unwrap()
    }

    fn matcher(names: &[&str]) -> TermMatcher {
        let vocab: Vocabulary = names
            .iter()
            .map(|n| VocabularyEntry::new(*n, format!("c:{n}")))
            .collect();
        TermMatcher::new(&vocab, 3).unwrap()
    }

    fn texts(doc: &Document, set: &DecorationSet) -> Vec<String> {
        set.iter()
            .map(|m| doc.slice_to_cow(m.range.clone()).into_owned())
            .collect()
    }

    #[test]
    fn downstream_order() {
        assert_eq!(PassName::Mentions.with_downstream(), &PassName::ALL);
        assert_eq!(
            PassName::KnownTerms.with_downstream(),
            &[PassName::KnownTerms, PassName::HeuristicTerms]
        );
        assert_eq!(
            PassName::HeuristicTerms.with_downstream(),
            &[PassName::HeuristicTerms]
        );
    }

    #[test]
    fn terms_skip_code_and_mention_markers() {
        let d = doc("Rust and `Rust` and [[Rust]]\n\n```\nRust\n```\n\n> Rust again\n");
        let set = compute_terms(&d, &matcher(&["Rust"]), &[]);
        let positions: Vec<_> = set.iter().map(|m| m.range.clone()).collect();
        assert_eq!(positions, vec![0..4, 46..50]);
        assert_eq!(texts(&d, &set), vec!["Rust", "Rust"]);
    }

    #[test]
    fn terms_respect_excluded_sets() {
        let d = doc("Tokio runtime and Tokio tasks\n");
        let known = compute_terms(&d, &matcher(&["Tokio"]), &[]);
        assert_eq!(known.len(), 2);

        let blocked = DecorationSet::from_ranges(vec![MatchRange {
            range: 0..5,
            subject: SubjectRef::new("c:mention"),
            status: MatchStatus::Ok,
        }]);
        let heuristic = compute_terms(&d, &matcher(&["Tokio", "runtime"]), &[&blocked]);
        assert_eq!(texts(&d, &heuristic), vec!["runtime", "Tokio"]);
        assert_eq!(heuristic.ranges()[1].range, 18..23);
    }

    #[test]
    fn block_id_markers_are_not_matched() {
        let d = doc("a note ^rust\n");
        assert!(compute_terms(&d, &matcher(&["rust"]), &[]).is_empty());
    }

    #[test]
    fn mentions_become_sorted_decorations() {
        let d = doc("alpha beta gamma ^b1\n");
        let anchor = |id: &str, start, end, surface: &str| Anchor {
            anchor_id: AnchorId(id.to_string()),
            block_id: BlockId::parse("b1").unwrap(),
            start_offset: start,
            end_offset: end,
            surface_text: surface.to_string(),
            subject: SubjectRef::new(format!("c:{surface}")),
        };
        let anchors = vec![anchor("2", 11, 16, "gamma"), anchor("1", 0, 5, "alpha")];
        let set = compute_mentions(&d, &anchors, RepairPolicy::default());
        assert_eq!(texts(&d, &set), vec!["alpha", "gamma"]);
    }
}
