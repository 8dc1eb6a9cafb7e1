//! One open document with its annotations kept current across edits.
//!
//! Every content edit runs the same cycle: apply the command, give new blocks
//! an id, then bring the annotation passes up to date. Selection changes
//! skip the id step and only remap decorations.

use std::{ops::Range, sync::Arc, time::Instant};

use log::debug;

use crate::annotate::{
    Anchor, Annotator, DecorationSet, LinkError, NewAnchor, PassInputs, PassName, SubjectRef,
    Vocabulary, VocabularyEntry, anchor_from_selection,
};
use crate::editing::{
    Cmd, Document, EditError, Patch, assign_missing_ids, check_ids_kept,
};
use crate::settings::Settings;
use crate::sync::{
    ConceptProvider, Debouncer, DocumentId, MentionStore, ProviderError, Refresh, Ticket,
};

/// What one applied command did to the document.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The user's edit.
    pub edit: Patch,
    /// Id markers inserted afterwards, if any block needed one.
    pub ids: Option<Patch>,
}

/// Outstanding fetches started by [`EditSession::poll_refresh`].
#[derive(Debug)]
pub struct RefreshTickets {
    pub vocabulary: Ticket,
    pub anchors: Ticket,
}

#[derive(Debug)]
pub struct EditSession {
    document: Document,
    annotator: Annotator,
    vocabulary: Refresh<Vocabulary>,
    anchors: Refresh<[Anchor]>,
    debouncer: Debouncer,
}

impl EditSession {
    /// Opens `document` and computes its first decorations. Existing blocks
    /// without ids are left alone until the first content edit.
    pub fn new(document: Document, settings: Settings, inputs: PassInputs) -> Self {
        let debouncer = Debouncer::new(settings.refresh_debounce());
        let vocabulary = Refresh::new(Arc::clone(&inputs.known));
        let anchors = Refresh::new(Arc::clone(&inputs.anchors));
        let mut annotator = Annotator::new(settings, inputs);
        annotator.update(&document, &[]);
        Self {
            document,
            annotator,
            vocabulary,
            anchors,
            debouncer,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn decorations(&self, pass: PassName) -> &DecorationSet {
        self.annotator.decorations(pass)
    }

    /// Applies a user edit. Edits that would rewrite an existing block id
    /// in place are rejected with [`EditError::TouchesBlockId`].
    pub fn apply(&mut self, cmd: Cmd) -> Result<Applied, EditError> {
        check_ids_kept(&self.document, &cmd)?;
        let edit = self.document.apply(cmd)?;
        let ids = if edit.doc_changed() {
            assign_missing_ids(&mut self.document, &self.annotator.settings().id_block_kinds)
        } else {
            None
        };

        match &ids {
            Some(ids) => self.annotator.update(&self.document, &[&edit, ids]),
            None => self.annotator.update(&self.document, &[&edit]),
        }
        debug!(
            "applied edit, document now at version {}",
            self.document.version()
        );
        Ok(Applied { edit, ids })
    }

    /// Gives every eligible block without an id one now, outside the edit
    /// cycle. Used before saving a document that was only opened.
    pub fn assign_ids(&mut self) -> Option<Patch> {
        let patch =
            assign_missing_ids(&mut self.document, &self.annotator.settings().id_block_kinds)?;
        self.annotator.update(&self.document, &[&patch]);
        Some(patch)
    }

    pub fn select(&mut self, range: Range<usize>) -> Patch {
        let patch = self.document.select(range);
        self.annotator.update(&self.document, &[&patch]);
        patch
    }

    /// Recomputes whatever is due without an edit.
    pub fn refresh(&mut self) {
        self.annotator.update(&self.document, &[]);
    }

    pub fn invalidate(&mut self, pass: PassName) {
        self.annotator.invalidate(pass);
    }

    pub fn set_enabled(&mut self, pass: PassName, enabled: bool) {
        self.annotator.set_enabled(pass, enabled);
        self.refresh();
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.debouncer = Debouncer::new(settings.refresh_debounce());
        self.annotator.set_settings(settings);
        self.refresh();
    }

    /// Replaces pass inputs and recomputes the passes they feed.
    pub fn set_inputs(&mut self, inputs: PassInputs) {
        self.vocabulary = Refresh::new(Arc::clone(&inputs.known));
        self.anchors = Refresh::new(Arc::clone(&inputs.anchors));
        self.annotator.set_inputs(inputs);
        self.refresh();
    }

    /// An anchor for the current selection, ready for a mention store.
    pub fn link_selection(&self, subject: SubjectRef) -> Result<NewAnchor, LinkError> {
        anchor_from_selection(&self.document, self.document.selection(), subject)
    }

    /// Asks for the concept vocabulary and anchors to be fetched again once
    /// triggers stop arriving.
    pub fn request_refresh(&mut self, now: Instant) {
        self.debouncer.trigger(now);
    }

    /// Starts the fetches once the debounce period has passed. Hand the
    /// tickets back through the `complete_*` methods with the results.
    pub fn poll_refresh(&mut self, now: Instant) -> Option<RefreshTickets> {
        if !self.debouncer.poll(now) {
            return None;
        }
        Some(RefreshTickets {
            vocabulary: self.vocabulary.begin(),
            anchors: self.anchors.begin(),
        })
    }

    /// Returns whether the result was current and applied.
    pub fn complete_vocabulary(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<VocabularyEntry>, ProviderError>,
    ) -> bool {
        if !self
            .vocabulary
            .complete(ticket, result.map(|entries| Arc::new(Vocabulary::new(entries))))
        {
            return false;
        }
        let mut inputs = self.annotator.inputs().clone();
        inputs.known = Arc::clone(self.vocabulary.current());
        self.annotator.set_inputs(inputs);
        self.refresh();
        true
    }

    /// Returns whether the result was current and applied.
    pub fn complete_anchors(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Anchor>, ProviderError>,
    ) -> bool {
        if !self.anchors.complete(ticket, result.map(Arc::from)) {
            return false;
        }
        let mut inputs = self.annotator.inputs().clone();
        inputs.anchors = Arc::clone(self.anchors.current());
        self.annotator.set_inputs(inputs);
        self.refresh();
        true
    }

    /// Fetches both inputs immediately, bypassing the debounce.
    pub fn fetch_now<C, S>(&mut self, concepts: &C, store: &S, document: &DocumentId)
    where
        C: ConceptProvider + ?Sized,
        S: MentionStore + ?Sized,
    {
        let vocabulary = self.vocabulary.begin();
        let anchors = self.anchors.begin();
        self.complete_vocabulary(vocabulary, concepts.get_all());
        self.complete_anchors(anchors, store.list_for_document(document));
    }

    /// Links the current selection to `subject` through `store` and shows the
    /// new mention right away.
    pub fn link_to<S: MentionStore + ?Sized>(
        &mut self,
        store: &mut S,
        document: &DocumentId,
        subject: SubjectRef,
    ) -> Result<Anchor, LinkOrStoreError> {
        let new = self.link_selection(subject)?;
        let anchor = store.create(document, new)?;

        let mut anchors = self.annotator.inputs().anchors.to_vec();
        anchors.push(anchor.clone());
        let mut inputs = self.annotator.inputs().clone();
        inputs.anchors = anchors.into();
        self.anchors = Refresh::new(Arc::clone(&inputs.anchors));
        self.annotator.set_inputs(inputs);
        self.refresh();
        Ok(anchor)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LinkOrStoreError {
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Store(#[from] ProviderError),
}
