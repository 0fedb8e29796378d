//! Caller-facing resource store.
//!
//! # Architecture
//!
//! * [`store`]: [`RcStore`], reads, writes, renames and deletes keys in
//!   cached resource files.
//! * [`translate`]: Fallback from legacy style keys to the `*.appearance`
//!   naming.
//! * [`typed`]: Bool, integer, string and color accessors.
//! * [`style`]: Parsing of texture descriptions such as
//!   `raised gradient vertical bevel1`.

use thiserror::Error;

use crate::cache::CacheError;

pub mod store;
pub mod style;
pub mod translate;
pub mod typed;

pub use store::{RcStore, StoreOptions};
pub use style::{BevelPosition, BevelStyle, StyleItem, Texture};
pub use translate::{translate_legacy_key, TranslatedKey};
pub use typed::Rgb;

/// Errors returned by [`RcStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key is empty, too long, or would not read back as the same key.
    #[error("invalid key: '{0}'")]
    InvalidKey(String),

    /// The value spans lines or cannot be written in the file's encoding.
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: &'static str },

    /// Loading or writing a file failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
