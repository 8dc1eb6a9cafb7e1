use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a block.
///
/// Ids are persisted in the markdown source itself as a trailing ` ^id`
/// marker, so they survive every edit that does not delete the block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generates a fresh random id (UUID v4, simple form).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Accepts `s` if it only uses marker-safe characters.
    pub fn parse(s: &str) -> Option<Self> {
        BlockIdMarker::is_valid_id(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A block-id marker found at the end of a line body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingMarker {
    /// Offset where block content ends (whitespace before the sigil excluded).
    pub content_end: usize,
    /// Offset just past the last id character.
    pub marker_end: usize,
    pub id: BlockId,
}

/// Syntax owner for ` ^id` block-id markers.
pub struct BlockIdMarker;

impl BlockIdMarker {
    pub const SIGIL: char = '^';

    pub fn is_id_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '-' || c == '_'
    }

    pub fn is_valid_id(s: &str) -> bool {
        !s.is_empty() && s.chars().all(Self::is_id_char)
    }

    /// Splits a trailing marker off a line body (no line terminator).
    ///
    /// The sigil must be separated from preceding content by whitespace, so
    /// `2^10` is text while `e = mc^2 ^k9` carries the id `k9`.
    pub fn split_trailing(body: &str) -> Option<TrailingMarker> {
        let trimmed = body.trim_end();
        let sigil = trimmed.rfind(Self::SIGIL)?;
        let id = &trimmed[sigil + Self::SIGIL.len_utf8()..];
        if !Self::is_valid_id(id) {
            return None;
        }
        let before = &trimmed[..sigil];
        let content_end = before.trim_end().len();
        if content_end == before.len() || content_end == 0 {
            return None;
        }
        Some(TrailingMarker {
            content_end,
            marker_end: trimmed.len(),
            id: BlockId(id.to_string()),
        })
    }

    /// Text inserted after block content to persist `id`.
    pub fn render(id: &BlockId) -> String {
        format!(" {}{}", Self::SIGIL, id)
    }
}
