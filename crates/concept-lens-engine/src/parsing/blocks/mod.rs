//! # Block Parsing
//!
//! Two-phase block parsing over a container stack.
//!
//! 1. **Line Classification** (`classify`): each line becomes a `LineClass`
//!    of local facts (blockquote depth, fence and heading detection, blank
//!    status).
//! 2. **Block Construction** (`builder`): a `BlockBuilder` tracks containers
//!    and emits `BlockNode`s as leaves open and close.
//!
//! ## Key Invariants
//!
//! - Fenced code blocks are raw zones: no block/inline parsing inside
//! - All block nodes store byte spans into the rope
//! - A trailing ` ^id` marker is split off into `BlockNode::id` and never
//!   appears in block content

pub mod builder;
pub mod classify;
pub mod containers;
pub mod content;
pub mod kinds;
pub mod open;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::{LineClass, MarkdownLineClassifier};
pub use content::{ContentLine, ContentView};
pub use kinds::{BlockId, BlockIdMarker};
pub use types::{BlockKind, BlockNode, BlockTag, ContainerFrame};
