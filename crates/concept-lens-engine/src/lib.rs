pub mod annotate;
pub mod editing;
pub mod host;
pub mod io;
pub mod parsing;
pub mod session;
pub mod settings;
pub mod sync;

// Re-export key types for easier usage
pub use annotate::{
    Anchor, AnchorId, Annotator, DecorationSet, MatchRange, MatchStatus, NewAnchor, PassInputs,
    PassName, SubjectRef, Vocabulary, VocabularyEntry,
};
pub use editing::{Cmd, Document, EditError, Patch};
pub use host::{BlockProvider, BlockRef, BlockText, LeafKind, TextLeaf};
pub use io::IoError;
pub use parsing::blocks::{BlockId, BlockKind, BlockTag};
pub use session::{Applied, EditSession};
pub use settings::{PassToggles, RepairPolicy, Settings};
pub use sync::{ConceptProvider, DocumentId, MentionStore, ProviderError};
