//! Vocabulary term matching over a single text.
//!
//! Longer names are tried first and accepted ranges never overlap, so
//! "Machine Learning" claims its span before "Learning" is considered. Each
//! name prefers word-bounded occurrences and only falls back to plain
//! substring occurrences when it has no word-bounded one anywhere in the
//! text.

use std::{cmp::Reverse, collections::HashSet, ops::Range};

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::types::{SubjectRef, Vocabulary};

pub const DEFAULT_MIN_TERM_LENGTH: usize = 3;

/// Compiled pattern budget per name.
pub const DEFAULT_PATTERN_LIMIT: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("cannot compile pattern for term {name:?}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// A match relative to the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub range: Range<usize>,
    pub subject: SubjectRef,
}

#[derive(Debug)]
struct CompiledTerm {
    pattern: Regex,
    subject: SubjectRef,
}

/// A vocabulary compiled for repeated matching.
#[derive(Debug)]
pub struct TermMatcher {
    terms: Vec<CompiledTerm>,
}

impl TermMatcher {
    pub fn new(vocabulary: &Vocabulary, min_len: usize) -> Result<Self, MatchError> {
        Self::with_pattern_limit(vocabulary, min_len, DEFAULT_PATTERN_LIMIT)
    }

    /// Like [`TermMatcher::new`] with an explicit compiled-size limit per
    /// pattern. Names whose pattern exceeds it fail with [`MatchError`].
    pub fn with_pattern_limit(
        vocabulary: &Vocabulary,
        min_len: usize,
        limit: usize,
    ) -> Result<Self, MatchError> {
        let mut seen = HashSet::new();
        let mut kept: Vec<_> = vocabulary
            .entries()
            .iter()
            .filter(|e| !e.name.trim().is_empty())
            .filter(|e| seen.insert(e.name.to_lowercase()))
            .filter(|e| e.name.chars().count() >= min_len)
            .collect();
        // Stable: equal lengths keep vocabulary order.
        kept.sort_by_key(|e| Reverse(e.name.chars().count()));

        let terms = kept
            .into_iter()
            .map(|e| {
                let pattern = RegexBuilder::new(&regex::escape(&e.name))
                    .case_insensitive(true)
                    .size_limit(limit)
                    .build()
                    .map_err(|source| MatchError::Pattern {
                        name: e.name.clone(),
                        source,
                    })?;
                Ok(CompiledTerm {
                    pattern,
                    subject: e.subject.clone(),
                })
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        Ok(Self { terms })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Finds non-overlapping term occurrences in `text`, in position order.
    ///
    /// `is_excluded` gets each candidate range; excluded candidates are
    /// skipped without claiming their span.
    pub fn find(&self, text: &str, is_excluded: impl Fn(&Range<usize>) -> bool) -> Vec<TermMatch> {
        let mut accepted: Vec<TermMatch> = vec![];

        for term in &self.terms {
            let mut candidates = word_bounded(&term.pattern, text);
            if candidates.is_empty() {
                candidates = term.pattern.find_iter(text).map(|m| m.range()).collect();
            }

            for range in candidates {
                if is_excluded(&range) || accepted.iter().any(|a| overlaps(&a.range, &range)) {
                    continue;
                }
                accepted.push(TermMatch {
                    range,
                    subject: term.subject.clone(),
                });
            }
        }

        accepted.sort_by_key(|m| m.range.start);
        accepted
    }
}

/// One-shot form of [`TermMatcher::find`].
pub fn match_terms(
    text: &str,
    vocabulary: &Vocabulary,
    min_len: usize,
    is_excluded: impl Fn(&Range<usize>) -> bool,
) -> Result<Vec<TermMatch>, MatchError> {
    Ok(TermMatcher::new(vocabulary, min_len)?.find(text, is_excluded))
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Occurrences not adjacent to a letter or digit on either side.
///
/// A rejected occurrence is retried one character later, so `"xRust Rust"`
/// still finds the second `Rust`.
fn word_bounded(pattern: &Regex, text: &str) -> Vec<Range<usize>> {
    let mut out = vec![];
    let mut at = 0;
    while at <= text.len() {
        let Some(m) = pattern.find_at(text, at) else {
            break;
        };
        if m.is_empty() {
            break;
        }
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_none_or(|c| !c.is_alphanumeric()) && after.is_none_or(|c| !c.is_alphanumeric())
        {
            out.push(m.range());
            at = m.end();
        } else {
            at = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
    }
    out
}
