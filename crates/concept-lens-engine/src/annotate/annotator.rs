//! Runs the passes in order over one document and keeps their caches.

use std::{convert::Infallible, sync::Arc};

use super::cache::{CacheStats, DecorationCache};
use super::matcher::{MatchError, TermMatcher};
use super::pass::{PassInputs, PassName, compute_mentions, compute_terms};
use super::types::{DecorationSet, Vocabulary};
use crate::editing::Patch;
use crate::host::BlockProvider;
use crate::settings::Settings;

/// A vocabulary compiled once and reused until the `Arc` is swapped.
#[derive(Debug, Default)]
struct CompiledVocabulary {
    compiled: Option<(Arc<Vocabulary>, usize, Arc<TermMatcher>)>,
}

impl CompiledVocabulary {
    fn get(
        &mut self,
        vocabulary: &Arc<Vocabulary>,
        min_len: usize,
    ) -> Result<Arc<TermMatcher>, MatchError> {
        if let Some((source, len, matcher)) = &self.compiled
            && Arc::ptr_eq(source, vocabulary)
            && *len == min_len
        {
            return Ok(Arc::clone(matcher));
        }
        let matcher = Arc::new(TermMatcher::new(vocabulary, min_len)?);
        self.compiled = Some((Arc::clone(vocabulary), min_len, Arc::clone(&matcher)));
        Ok(matcher)
    }
}

#[derive(Debug)]
pub struct Annotator {
    settings: Settings,
    inputs: PassInputs,
    mentions: DecorationCache,
    known: DecorationCache,
    heuristic: DecorationCache,
    known_matcher: CompiledVocabulary,
    heuristic_matcher: CompiledVocabulary,
}

impl Annotator {
    pub fn new(settings: Settings, inputs: PassInputs) -> Self {
        let toggles = settings.passes;
        Self {
            mentions: DecorationCache::new(
                PassName::Mentions,
                toggles.is_enabled(PassName::Mentions),
            ),
            known: DecorationCache::new(
                PassName::KnownTerms,
                toggles.is_enabled(PassName::KnownTerms),
            ),
            heuristic: DecorationCache::new(
                PassName::HeuristicTerms,
                toggles.is_enabled(PassName::HeuristicTerms),
            ),
            settings,
            inputs,
            known_matcher: CompiledVocabulary::default(),
            heuristic_matcher: CompiledVocabulary::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn inputs(&self) -> &PassInputs {
        &self.inputs
    }

    fn cache(&self, pass: PassName) -> &DecorationCache {
        match pass {
            PassName::Mentions => &self.mentions,
            PassName::KnownTerms => &self.known,
            PassName::HeuristicTerms => &self.heuristic,
        }
    }

    fn cache_mut(&mut self, pass: PassName) -> &mut DecorationCache {
        match pass {
            PassName::Mentions => &mut self.mentions,
            PassName::KnownTerms => &mut self.known,
            PassName::HeuristicTerms => &mut self.heuristic,
        }
    }

    /// Replaces pass inputs. Passes whose input `Arc` changed are
    /// invalidated along with everything downstream of them.
    pub fn set_inputs(&mut self, inputs: PassInputs) {
        let anchors_changed = !Arc::ptr_eq(&self.inputs.anchors, &inputs.anchors);
        let known_changed = !Arc::ptr_eq(&self.inputs.known, &inputs.known);
        let heuristic_changed = !Arc::ptr_eq(&self.inputs.heuristic, &inputs.heuristic);
        self.inputs = inputs;

        if anchors_changed {
            self.invalidate(PassName::Mentions);
        }
        if known_changed {
            self.invalidate(PassName::KnownTerms);
        }
        if heuristic_changed {
            self.invalidate(PassName::HeuristicTerms);
        }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        let old = std::mem::replace(&mut self.settings, settings);
        if old.repair_policy != self.settings.repair_policy {
            self.invalidate(PassName::Mentions);
        }
        if old.min_term_length != self.settings.min_term_length {
            self.invalidate(PassName::KnownTerms);
        }
        for pass in PassName::ALL {
            let enabled = self.settings.passes.is_enabled(pass);
            if old.passes.is_enabled(pass) != enabled {
                self.apply_enabled(pass, enabled);
            }
        }
    }

    /// Forces `pass` and the passes downstream of it to recompute on the
    /// next update.
    pub fn invalidate(&mut self, pass: PassName) {
        for &p in pass.with_downstream() {
            self.cache_mut(p).invalidate();
        }
    }

    pub fn set_enabled(&mut self, pass: PassName, enabled: bool) {
        self.settings.passes.set(pass, enabled);
        self.apply_enabled(pass, enabled);
    }

    fn apply_enabled(&mut self, pass: PassName, enabled: bool) {
        self.cache_mut(pass).set_enabled(enabled);
        // Downstream exclusion zones just changed.
        for &p in &pass.with_downstream()[1..] {
            self.cache_mut(p).invalidate();
        }
    }

    pub fn is_enabled(&self, pass: PassName) -> bool {
        self.cache(pass).is_enabled()
    }

    pub fn decorations(&self, pass: PassName) -> &DecorationSet {
        self.cache(pass).decorations()
    }

    pub fn stats(&self, pass: PassName) -> CacheStats {
        self.cache(pass).stats()
    }

    /// Brings every pass up to date with `provider`.
    ///
    /// `patches` are the edits applied since the last update, oldest first.
    /// Pass an empty slice to refresh without an edit.
    pub fn update<P: BlockProvider + ?Sized>(&mut self, provider: &P, patches: &[&Patch]) {
        let policy = self.settings.repair_policy;
        let min_len = self.settings.min_term_length;

        let anchors = &self.inputs.anchors;
        self.mentions.update(patches, || {
            Ok::<_, Infallible>(compute_mentions(provider, anchors, policy))
        });

        let mentions = self.mentions.decorations();
        let known_vocabulary = &self.inputs.known;
        let known_matcher = &mut self.known_matcher;
        self.known.update(patches, || {
            let matcher = known_matcher.get(known_vocabulary, min_len)?;
            Ok::<_, MatchError>(compute_terms(provider, &matcher, &[mentions]))
        });

        let known = self.known.decorations();
        let heuristic_vocabulary = &self.inputs.heuristic;
        let heuristic_matcher = &mut self.heuristic_matcher;
        self.heuristic.update(patches, || {
            let matcher = heuristic_matcher.get(heuristic_vocabulary, min_len)?;
            Ok::<_, MatchError>(compute_terms(provider, &matcher, &[mentions, known]))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::types::{Anchor, AnchorId, MatchStatus, SubjectRef, VocabularyEntry};
    use crate::editing::{Cmd, Document};
    use crate::parsing::blocks::BlockId;
    use pretty_assertions::assert_eq;

    fn vocab(names: &[&str]) -> Vocabulary {
        names
            .iter()
            .map(|n| VocabularyEntry::new(*n, format!("c:{}", n.to_lowercase())))
            .collect()
    }

    fn anchor(block: &str, start: usize, end: usize, surface: &str) -> Anchor {
        Anchor {
            anchor_id: AnchorId(format!("a-{surface}")),
            block_id: BlockId::parse(block).unwrap(),
            start_offset: start,
            end_offset: end,
            surface_text: surface.to_string(),
            subject: SubjectRef::new("c:linked"),
        }
    }

    fn texts(doc: &Document, annotator: &Annotator, pass: PassName) -> Vec<String> {
        annotator
            .decorations(pass)
            .iter()
            .map(|m| doc.slice_to_cow(m.range.clone()).into_owned())
            .collect()
    }

    fn setup() -> (Document, Annotator) {
        let doc = Document::from_bytes(b"Tokio drives async Rust code ^p1\n").unwrap();
        let inputs = PassInputs::new(
            vec![anchor("p1", 0, 5, "Tokio")],
            vocab(&["Tokio", "Rust"]),
            vocab(&["async", "Rust", "code"]),
        );
        let mut annotator = Annotator::new(Settings::default(), inputs);
        annotator.update(&doc, &[]);
        (doc, annotator)
    }

    #[test]
    fn test_passes_exclude_upstream_ranges() {
        let (doc, annotator) = setup();
        assert_eq!(texts(&doc, &annotator, PassName::Mentions), vec!["Tokio"]);
        assert_eq!(texts(&doc, &annotator, PassName::KnownTerms), vec!["Rust"]);
        assert_eq!(
            texts(&doc, &annotator, PassName::HeuristicTerms),
            vec!["async", "code"]
        );
    }

    #[test]
    fn test_selection_only_update_remaps_every_pass() {
        let (mut doc, mut annotator) = setup();
        let patch = doc.select(3..8);
        annotator.update(&doc, &[&patch]);
        for pass in PassName::ALL {
            assert_eq!(annotator.stats(pass).recomputes, 1, "{pass}");
            assert_eq!(annotator.stats(pass).remaps, 1, "{pass}");
        }
    }

    #[test]
    fn test_edit_recomputes_and_repairs() {
        let (mut doc, mut annotator) = setup();
        let patch = doc
            .apply(Cmd::InsertText {
                at: 0,
                text: "Using ".to_string(),
            })
            .unwrap();
        annotator.update(&doc, &[&patch]);

        let mention = &annotator.decorations(PassName::Mentions).ranges()[0];
        assert_eq!(mention.status, MatchStatus::Repaired);
        assert_eq!(doc.slice_to_cow(mention.range.clone()), "Tokio");
        assert_eq!(annotator.stats(PassName::KnownTerms).recomputes, 2);
    }

    #[test]
    fn test_invalidate_cascades_downstream() {
        let (doc, mut annotator) = setup();
        annotator.invalidate(PassName::KnownTerms);
        annotator.update(&doc, &[]);
        assert_eq!(annotator.stats(PassName::Mentions).recomputes, 1);
        assert_eq!(annotator.stats(PassName::KnownTerms).recomputes, 2);
        assert_eq!(annotator.stats(PassName::HeuristicTerms).recomputes, 2);
    }

    #[test]
    fn test_swapping_vocabulary_invalidates_only_affected_passes() {
        let (doc, mut annotator) = setup();
        let mut inputs = annotator.inputs().clone();
        inputs.heuristic = Arc::new(vocab(&["drives"]));
        annotator.set_inputs(inputs);
        annotator.update(&doc, &[]);

        assert_eq!(annotator.stats(PassName::KnownTerms).recomputes, 1);
        assert_eq!(annotator.stats(PassName::HeuristicTerms).recomputes, 2);
        assert_eq!(
            texts(&doc, &annotator, PassName::HeuristicTerms),
            vec!["drives"]
        );
    }

    #[test]
    fn test_settings_change_invalidates_matching_passes() {
        let (doc, mut annotator) = setup();
        let mut settings = annotator.settings().clone();
        settings.min_term_length = 5;
        annotator.set_settings(settings);
        annotator.update(&doc, &[]);

        assert_eq!(annotator.stats(PassName::Mentions).recomputes, 1);
        assert!(annotator.decorations(PassName::KnownTerms).is_empty());
        assert_eq!(
            texts(&doc, &annotator, PassName::HeuristicTerms),
            vec!["async"]
        );
    }

    #[test]
    fn test_same_inputs_invalidate_nothing() {
        let (doc, mut annotator) = setup();
        annotator.set_inputs(annotator.inputs().clone());
        annotator.update(&doc, &[]);
        for pass in PassName::ALL {
            assert_eq!(annotator.stats(pass).recomputes, 1);
        }
    }

    #[test]
    fn test_disabling_mentions_frees_their_spans() {
        let (doc, mut annotator) = setup();
        annotator.set_enabled(PassName::Mentions, false);
        annotator.update(&doc, &[]);

        assert!(annotator.decorations(PassName::Mentions).is_empty());
        assert_eq!(
            texts(&doc, &annotator, PassName::KnownTerms),
            vec!["Tokio", "Rust"]
        );

        annotator.set_enabled(PassName::Mentions, true);
        annotator.update(&doc, &[]);
        assert_eq!(texts(&doc, &annotator, PassName::Mentions), vec!["Tokio"]);
        assert_eq!(texts(&doc, &annotator, PassName::KnownTerms), vec!["Rust"]);
    }

    #[test]
    fn test_bad_vocabulary_keeps_previous_ranges() {
        let (doc, mut annotator) = setup();
        let mut inputs = annotator.inputs().clone();
        inputs.known = Arc::new(vocab(&[&"x".repeat(200_000)]));
        annotator.set_inputs(inputs);
        annotator.update(&doc, &[]);

        assert_eq!(texts(&doc, &annotator, PassName::KnownTerms), vec!["Rust"]);
        assert_eq!(annotator.stats(PassName::KnownTerms).failures, 1);
    }
}
