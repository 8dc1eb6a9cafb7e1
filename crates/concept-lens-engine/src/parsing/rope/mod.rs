//! Rope access helpers: byte spans, line iteration, and slicing.

pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{LineRef, lines_with_spans};
pub use slice::{preview, slice_to_string};
pub use span::Span;
