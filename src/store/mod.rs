//! Per-file entry storage.
//!
//! # Architecture
//!
//! - [`entry`]: A single line of a resource file, keyed or comment
//! - [`line_store`]: The ordered, hash-indexed collection of a file's entries

pub mod entry;
pub mod line_store;

pub use entry::{Entry, EntryId};
pub use line_store::{LineStore, BUCKET_COUNT, MAX_KEYWORD_LENGTH};
