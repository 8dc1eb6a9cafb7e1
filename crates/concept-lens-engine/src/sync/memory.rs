//! In-process providers for tests, benches and the command line.

use super::{ConceptProvider, DocumentId, MentionStore, ProviderError};
use crate::annotate::{Anchor, AnchorId, NewAnchor, VocabularyEntry};

/// A fixed list of concepts.
#[derive(Debug, Clone, Default)]
pub struct StaticConceptProvider {
    entries: Vec<VocabularyEntry>,
}

impl StaticConceptProvider {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self { entries }
    }
}

impl ConceptProvider for StaticConceptProvider {
    /// Case-insensitive substring search over names.
    fn search(&self, query: &str) -> Result<Vec<VocabularyEntry>, ProviderError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn get_all(&self) -> Result<Vec<VocabularyEntry>, ProviderError> {
        Ok(self.entries.clone())
    }
}

/// Anchors for any number of documents, kept in creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMentionStore {
    records: Vec<(DocumentId, Anchor)>,
}

impl InMemoryMentionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<(DocumentId, Anchor)>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[(DocumentId, Anchor)] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MentionStore for InMemoryMentionStore {
    fn create(
        &mut self,
        document: &DocumentId,
        anchor: NewAnchor,
    ) -> Result<Anchor, ProviderError> {
        if anchor.surface_text.is_empty() || anchor.start_offset >= anchor.end_offset {
            return Err(ProviderError::Rejected(format!(
                "empty span {}..{}",
                anchor.start_offset, anchor.end_offset
            )));
        }
        let anchor = anchor.with_id(AnchorId::generate());
        self.records.push((document.clone(), anchor.clone()));
        Ok(anchor)
    }

    fn delete(&mut self, anchor_id: &AnchorId) -> Result<(), ProviderError> {
        let before = self.records.len();
        self.records.retain(|(_, a)| &a.anchor_id != anchor_id);
        if self.records.len() == before {
            return Err(ProviderError::AnchorNotFound(anchor_id.clone()));
        }
        Ok(())
    }

    fn list_for_document(&self, document: &DocumentId) -> Result<Vec<Anchor>, ProviderError> {
        Ok(self
            .records
            .iter()
            .filter(|(doc, _)| doc == document)
            .map(|(_, anchor)| anchor.clone())
            .collect())
    }
}
