//! Key matching: wildcard patterns and similarity scoring.
//!
//! # Architecture
//!
//! - [`xrm`]: Dotted-component wildcard matcher with graded scores, used for
//!   wildcard fallback on reads and for pattern deletes
//! - [`similarity`]: Heuristic that picks where a brand-new key is inserted

pub mod similarity;
pub mod xrm;

pub use similarity::{best_insertion_point, similarity};
pub use xrm::{component_count, is_wildcard, scan_component, xrm_match};
