//! Decorations over a document: resolved mentions plus matched terms.
//!
//! Three passes run in order on every update. [`PassName::Mentions`]
//! resolves stored anchors, [`PassName::KnownTerms`] matches the concept
//! vocabulary outside the mentions, and [`PassName::HeuristicTerms`] matches
//! candidate terms outside both. Each pass keeps its result in a
//! [`DecorationCache`] that remaps through selection-only edits and
//! recomputes after content changes.

pub mod annotator;
pub mod cache;
pub mod link;
pub mod matcher;
pub mod pass;
pub mod report;
pub mod resolver;
pub mod types;

pub use annotator::Annotator;
pub use cache::{CacheState, CacheStats, DecorationCache};
pub use link::{LinkError, anchor_from_selection};
pub use matcher::{MatchError, TermMatch, TermMatcher, match_terms};
pub use pass::{PassInputs, PassName};
pub use report::render_report;
pub use resolver::{RepairPolicy, resolve, resolve_all};
pub use types::{
    Anchor, AnchorId, DecorationSet, MatchRange, MatchStatus, NewAnchor, SubjectRef, Vocabulary,
    VocabularyEntry,
};
