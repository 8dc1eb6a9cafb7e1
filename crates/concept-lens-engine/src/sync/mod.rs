//! Seams to the services that own concepts and stored mentions.
//!
//! The engine itself is synchronous. Fetches are modelled as a ticket taken
//! before the request and handed back with the result, so a slow response
//! that has been overtaken by a newer request is dropped instead of
//! overwriting fresher data.

pub mod memory;
pub mod refresh;

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotate::{Anchor, AnchorId, NewAnchor, Vocabulary, VocabularyEntry};

pub use memory::{InMemoryMentionStore, StaticConceptProvider};
pub use refresh::{Debouncer, Refresh, Ticket};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("anchor not found: {0}")]
    AnchorNotFound(AnchorId),
    #[error("anchor rejected: {0}")]
    Rejected(String),
}

/// Identifies the document a set of mentions belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of known concepts.
pub trait ConceptProvider {
    /// Concepts whose name matches `query`.
    fn search(&self, query: &str) -> Result<Vec<VocabularyEntry>, ProviderError>;

    fn get_all(&self) -> Result<Vec<VocabularyEntry>, ProviderError>;
}

/// Persistence for anchors. Anchors are created and deleted only on explicit
/// user action; resolution never writes back.
pub trait MentionStore {
    fn create(&mut self, document: &DocumentId, anchor: NewAnchor)
    -> Result<Anchor, ProviderError>;

    fn delete(&mut self, anchor_id: &AnchorId) -> Result<(), ProviderError>;

    fn list_for_document(&self, document: &DocumentId) -> Result<Vec<Anchor>, ProviderError>;
}

/// The full concept vocabulary, or an empty one when the provider fails.
pub fn fetch_vocabulary<C: ConceptProvider + ?Sized>(provider: &C) -> Vocabulary {
    match provider.get_all() {
        Ok(entries) => Vocabulary::new(entries),
        Err(e) => {
            warn!("concept fetch failed, using empty vocabulary: {e}");
            Vocabulary::default()
        }
    }
}

/// A document's anchors, or none when the store fails.
pub fn fetch_anchors<S: MentionStore + ?Sized>(store: &S, document: &DocumentId) -> Vec<Anchor> {
    store.list_for_document(document).unwrap_or_else(|e| {
        warn!("anchor fetch for {document} failed, showing no mentions: {e}");
        vec![]
    })
}
