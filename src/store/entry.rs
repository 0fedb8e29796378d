//! Entry definitions.

use crate::matcher::is_wildcard;
use crate::parse::hash_key;

/// Stable handle to an entry inside a [`LineStore`](super::LineStore).
///
/// Handles stay valid until the entry is removed; a removed handle may be
/// reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    /// Raw slot index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One logical line of a resource file.
///
/// Keyed lines carry a lower-cased `key` for lookups and the `raw_key` as
/// written, so that rewriting the file keeps the author's letter case.
/// Comment and blank lines have an empty key and keep the whole line as
/// their value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    raw_key: String,
    value: String,
    hash: u32,
    is_wildcard: bool,
    dirty: bool,
}

impl Entry {
    /// Create a keyed entry.
    ///
    /// The key ends at the first `:`; if nothing is left after folding the
    /// entry degrades to a comment holding `value`.
    ///
    /// # Arguments
    ///
    /// * `key` - Key in any letter case
    /// * `value` - Value text
    #[must_use]
    pub fn keyed(key: &str, value: &str) -> Self {
        let hashed = hash_key(key, Some(':'));
        if hashed.is_empty() {
            return Self::comment(value);
        }
        let raw_key = key[..hashed.len()].to_string();
        let wild = is_wildcard(&hashed.folded);
        Self {
            key: hashed.folded,
            raw_key,
            value: value.to_string(),
            hash: hashed.hash,
            is_wildcard: wild,
            dirty: false,
        }
    }

    /// Create a comment (or blank) entry holding `line` verbatim.
    #[must_use]
    pub fn comment(line: &str) -> Self {
        Self {
            key: String::new(),
            raw_key: String::new(),
            value: line.to_string(),
            hash: 0,
            is_wildcard: false,
            dirty: false,
        }
    }

    /// Lower-cased key, empty for comments.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key with its original letter case.
    #[must_use]
    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }

    /// Value, or the whole line for comments.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Hash of the lower-cased key.
    #[must_use]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Whether the key contains `*` or `?`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }

    /// Whether this is a comment or blank line.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.key.is_empty()
    }

    /// Whether the on-disk text no longer matches this entry.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Replace the stored letter case of the key. The folded key must not
    /// change, so callers pass a key that folds to [`Entry::key`].
    pub(crate) fn set_raw_key(&mut self, raw_key: &str) {
        debug_assert!(raw_key.eq_ignore_ascii_case(&self.raw_key));
        self.raw_key = raw_key.to_string();
    }
}
