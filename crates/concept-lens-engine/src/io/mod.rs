//! File access for documents, vocabularies and stored anchors.
//!
//! Vocabulary file:
//!
//! ```toml
//! [[concept]]
//! name = "Machine Learning"
//! subject = "concept:ml"
//!
//! [[candidate]]
//! name = "gradient descent"
//! subject = "candidate:gradient-descent"
//! ```
//!
//! Anchors file, one `[[anchor]]` table per stored mention:
//!
//! ```toml
//! [[anchor]]
//! document = "notes/today.md"
//! anchor_id = "9b0c…"
//! block_id = "3f2a…"
//! start_offset = 6
//! end_offset = 9
//! surface_text = "AAA"
//! subject = "concept:aaa"
//! ```

use relative_path::RelativePath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::annotate::{Anchor, AnchorId, SubjectRef, Vocabulary, VocabularyEntry};
use crate::editing::Document;
use crate::parsing::blocks::BlockId;
use crate::sync::{DocumentId, InMemoryMentionStore};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Cannot serialize anchors: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{path} is not a valid document")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Both vocabularies of a vocabulary file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabularies {
    /// `[[concept]]` entries, matched by the known-terms pass.
    pub known: Vocabulary,
    /// `[[candidate]]` entries, matched by the heuristic pass.
    pub heuristic: Vocabulary,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct VocabularyFile {
    #[serde(default, rename = "concept")]
    concepts: Vec<VocabularyEntry>,
    #[serde(default, rename = "candidate")]
    candidates: Vec<VocabularyEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AnchorsFile {
    #[serde(default, rename = "anchor")]
    anchors: Vec<AnchorRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnchorRecord {
    document: DocumentId,
    anchor_id: AnchorId,
    block_id: BlockId,
    start_offset: usize,
    end_offset: usize,
    surface_text: String,
    subject: SubjectRef,
}

impl AnchorRecord {
    fn new(document: &DocumentId, anchor: &Anchor) -> Self {
        Self {
            document: document.clone(),
            anchor_id: anchor.anchor_id.clone(),
            block_id: anchor.block_id.clone(),
            start_offset: anchor.start_offset,
            end_offset: anchor.end_offset,
            surface_text: anchor.surface_text.clone(),
            subject: anchor.subject.clone(),
        }
    }

    fn into_parts(self) -> (DocumentId, Anchor) {
        (
            self.document,
            Anchor {
                anchor_id: self.anchor_id,
                block_id: self.block_id,
                start_offset: self.start_offset,
                end_offset: self.end_offset,
                surface_text: self.surface_text,
                subject: self.subject,
            },
        )
    }
}

/// Read a markdown document relative to `root`
pub fn read_document(relative_path: &RelativePath, root: &Path) -> Result<Document, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let bytes = fs::read(&absolute_path)?;
    Document::from_bytes(&bytes).map_err(|source| IoError::InvalidDocument {
        path: absolute_path,
        source,
    })
}

/// Write a document relative to `root`
pub fn write_document(
    relative_path: &RelativePath,
    root: &Path,
    document: &Document,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&absolute_path, document.to_bytes()).map_err(IoError::Io)
}

pub fn load_vocabulary(path: &Path) -> Result<Vocabularies, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let file: VocabularyFile = toml::from_str(&content).map_err(|source| IoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Vocabularies {
        known: Vocabulary::new(file.concepts),
        heuristic: Vocabulary::new(file.candidates),
    })
}

/// Load stored anchors. A missing file is an empty store.
pub fn load_anchors(path: &Path) -> Result<InMemoryMentionStore, IoError> {
    if !path.exists() {
        return Ok(InMemoryMentionStore::new());
    }
    let content = fs::read_to_string(path)?;
    let file: AnchorsFile = toml::from_str(&content).map_err(|source| IoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(InMemoryMentionStore::from_records(
        file.anchors
            .into_iter()
            .map(AnchorRecord::into_parts)
            .collect(),
    ))
}

pub fn save_anchors(path: &Path, store: &InMemoryMentionStore) -> Result<(), IoError> {
    let file = AnchorsFile {
        anchors: store
            .records()
            .iter()
            .map(|(document, anchor)| AnchorRecord::new(document, anchor))
            .collect(),
    };
    let content = toml::to_string_pretty(&file)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(IoError::Io)
}
