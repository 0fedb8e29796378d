//! Case-folding rolling hash for keys and paths.
//!
//! # Overview
//!
//! Every keyword lookup starts by folding the requested key to lower case
//! and hashing it in the same pass. The hash is a CRC-like fold over the
//! folded bytes: it only has to be internally consistent, it is never
//! compared against a standard CRC.
//!
//! # Example
//!
//! ```
//! use rcdb::parse::hash_key;
//!
//! let a = hash_key("Toolbar.Label.Color", None);
//! let b = hash_key("toolbar.label.color", None);
//! assert_eq!(a, b);
//! assert_eq!(a.folded, "toolbar.label.color");
//!
//! // Folding stops at the delimiter
//! let k = hash_key("menu.frame: bevel1", Some(':'));
//! assert_eq!(k.folded, "menu.frame");
//! ```

/// Polynomial folded into the running hash whenever its low bit is set.
pub const HASH_POLYNOMIAL: u32 = 0xEDB8_8320;

/// A key folded to lower case together with its hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashedKey {
    /// ASCII-lower-cased copy of the input prefix.
    pub folded: String,
    /// Rolling hash over the folded bytes.
    pub hash: u32,
}

impl HashedKey {
    /// Length of the folded key in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    /// Whether the folded key is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }
}

/// Fold `input` up to `delimiter` (or the end) and hash it.
///
/// ASCII letters are lower-cased; every other byte passes through
/// unchanged, so the folded text stays valid UTF-8.
///
/// # Arguments
///
/// * `input` - Key or path to fold
/// * `delimiter` - Optional character that ends the key (not included)
#[must_use]
pub fn hash_key(input: &str, delimiter: Option<char>) -> HashedKey {
    let prefix = match delimiter {
        Some(d) => input.split(d).next().unwrap_or(""),
        None => input,
    };

    let folded = prefix.to_ascii_lowercase();
    let hash = fold_hash(folded.as_bytes());
    HashedKey { folded, hash }
}

/// Hash bytes that are already folded.
#[must_use]
pub fn fold_hash(bytes: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &c in bytes {
        h ^= u32::from(c);
        if h & 1 != 0 {
            h ^= HASH_POLYNOMIAL;
        }
        h >>= 1;
    }
    h
}
