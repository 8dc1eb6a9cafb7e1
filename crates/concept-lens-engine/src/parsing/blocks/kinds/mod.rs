//! # Block Kinds
//!
//! Block-specific types that own their syntax delimiters. The classifier and
//! builder call these; they never hardcode `#`, `>`, fences or `^`.

pub mod block_id;
pub mod block_quote;
pub mod code_fence;
pub mod heading;

pub use block_id::{BlockId, BlockIdMarker, TrailingMarker};
pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use heading::Heading;
