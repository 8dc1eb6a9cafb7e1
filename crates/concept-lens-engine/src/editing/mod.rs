//! # Editing Core
//!
//! - The whole document lives in one `xi_rope::Rope` buffer; saving writes
//!   its bytes verbatim, so round-trips are lossless.
//! - Every edit is a [`Cmd`] compiled to an xi-rope `Delta`. The delta is
//!   kept on the resulting [`Patch`] and doubles as the position-shift
//!   function for anything anchored to the text.
//! - After each content change the buffer is re-parsed into blocks.
//! - [`identity`] writes stable block ids into the text as ` ^id` markers.

pub mod commands;
pub mod document;
pub mod identity;
pub mod patch;

pub use commands::{Cmd, EditError};
pub use document::Document;
pub use identity::{assign_missing_ids, check_ids_kept};
pub use patch::{Patch, RangeMapper};
