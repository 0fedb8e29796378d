//! Hashing and tokenizing of resource-file text.
//!
//! This module provides functionality for:
//! - Case-folding keys and paths while computing their rolling hash
//! - Cutting a file buffer into trimmed, tab-normalized logical lines
//!
//! # Architecture
//!
//! - [`hash`]: The folding hash shared by key lookups and the file cache
//! - [`lines`]: The line scanner, with optional backslash continuation

pub mod hash;
pub mod lines;

pub use hash::{fold_hash, hash_key, HashedKey, HASH_POLYNOMIAL};
pub use lines::{is_blank, LineScanner, ScanOptions, ScannedLine};
