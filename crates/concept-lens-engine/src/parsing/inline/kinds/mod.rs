//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters. The parser never
//! hardcodes `[[` or `` ` ``.

pub mod code_span;
pub mod wikilink;

pub use code_span::CodeSpan;
pub use wikilink::WikiLink;
