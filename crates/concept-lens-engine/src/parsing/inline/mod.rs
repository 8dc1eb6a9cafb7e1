//! # Inline Parsing
//!
//! Cursor-based inline parsing with explicit raw zones.
//!
//! - Code spans suppress all other inline parsing inside them
//! - WikiLinks are parsed only outside raw zones
//!
//! `` `[[not a link]]` `` parses as a single CodeSpan, not as text containing
//! a WikiLink.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::parse_inline;
pub use types::InlineNode;
