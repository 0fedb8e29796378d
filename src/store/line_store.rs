//! In-memory line store for one resource file.
//!
//! # Overview
//!
//! Entries live in an arena and are addressed by [`EntryId`]. Three
//! structures refer to them by id:
//!
//! - the **order**: every entry, in file order, which alone decides how the
//!   file is written back and where new keys are inserted;
//! - the **exact index**: [`BUCKET_COUNT`] hash buckets holding every
//!   non-wildcard keyed entry in bucket `hash % BUCKET_COUNT`;
//! - the **wildcard list**: every entry whose key contains `*` or `?`.
//!
//! Comments and blank lines appear only in the order.
//!
//! Buckets and the wildcard list are scanned newest first, so when a file
//! defines the same key twice the later definition wins.
//!
//! # Example
//!
//! ```
//! use rcdb::store::LineStore;
//! use rcdb::parse::ScanOptions;
//!
//! let text = "menu.frame: bevel1\n*.font: Tahoma\n# comment\n";
//! let store = LineStore::parse(text, ScanOptions::default());
//!
//! let id = store.lookup("Menu.Frame", true).unwrap();
//! assert_eq!(store.value(id), "bevel1");
//!
//! let id = store.lookup("toolbar.font", true).unwrap();
//! assert_eq!(store.value(id), "Tahoma");
//! assert!(store.lookup("toolbar.font", false).is_none());
//! ```

use crate::matcher::{is_wildcard, xrm_match};
use crate::parse::{hash_key, LineScanner, ScanOptions};

use super::entry::{Entry, EntryId};

/// Number of hash buckets in the exact index.
pub const BUCKET_COUNT: usize = 40;

/// Keys of this many bytes or more are not treated as keys.
pub const MAX_KEYWORD_LENGTH: usize = 200;

/// Ordered, indexed collection of a file's entries.
#[derive(Debug, Clone)]
pub struct LineStore {
    slots: Vec<Option<Entry>>,
    vacant: Vec<usize>,
    order: Vec<EntryId>,
    buckets: Vec<Vec<EntryId>>,
    wildcards: Vec<EntryId>,
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            order: Vec::new(),
            buckets: vec![Vec::new(); BUCKET_COUNT],
            wildcards: Vec::new(),
        }
    }

    /// Build a store from the text of a resource file.
    ///
    /// A line becomes a comment entry when it is blank, starts with `#` or
    /// `!`, has no `:`, or its key is empty or too long. Otherwise the key is
    /// the text before the first `:` and the value the text after it, with
    /// leading spaces skipped.
    #[must_use]
    pub fn parse(text: &str, options: ScanOptions) -> Self {
        let mut store = Self::new();
        for line in LineScanner::new(text, options) {
            let id = if line.is_comment() {
                store.insert_comment(&line.text)
            } else {
                match split_key_value(&line.text) {
                    Some((key, value)) => store.insert(key, value),
                    None => store.insert_comment(&line.text),
                }
            };
            store.push(id);
        }
        store
    }

    /// Number of entries in file order.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entry ids in file order.
    #[must_use]
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    /// Ids of wildcard entries, oldest first.
    #[must_use]
    pub fn wildcard_ids(&self) -> &[EntryId] {
        &self.wildcards
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Value of a live entry, empty if the id is stale.
    #[must_use]
    pub fn value(&self, id: EntryId) -> &str {
        self.get(id).map_or("", Entry::value)
    }

    /// Create a keyed entry and link it into its index.
    ///
    /// The entry is not yet part of the file order; place it with
    /// [`push`](Self::push) or [`insert_at`](Self::insert_at).
    pub fn insert(&mut self, key: &str, value: &str) -> EntryId {
        self.allocate(Entry::keyed(key, value))
    }

    /// Create a comment entry. Like [`insert`](Self::insert) it still has to
    /// be placed in the order.
    pub fn insert_comment(&mut self, line: &str) -> EntryId {
        self.allocate(Entry::comment(line))
    }

    fn allocate(&mut self, entry: Entry) -> EntryId {
        let id = match self.vacant.pop() {
            Some(index) => EntryId(index),
            None => {
                self.slots.push(None);
                EntryId(self.slots.len() - 1)
            }
        };

        if entry.is_wildcard() {
            self.wildcards.push(id);
        } else if !entry.is_comment() {
            self.buckets[bucket_of(entry.hash())].push(id);
        }
        self.slots[id.0] = Some(entry);
        id
    }

    /// Append an entry to the end of the file order.
    pub fn push(&mut self, id: EntryId) {
        self.order.push(id);
    }

    /// Place an entry at `position` in the file order (clamped to the end).
    pub fn insert_at(&mut self, position: usize, id: EntryId) {
        let position = position.min(self.order.len());
        self.order.insert(position, id);
    }

    /// Position of an entry in the file order.
    #[must_use]
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|x| *x == id)
    }

    /// Take an entry out of the file order, returning where it was.
    pub fn detach(&mut self, id: EntryId) -> Option<usize> {
        let position = self.position(id)?;
        self.order.remove(position);
        Some(position)
    }

    /// Unlink an entry from its index and free it.
    ///
    /// Callers detach the entry from the file order first.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let entry = self.slots.get_mut(id.0)?.take()?;
        if entry.is_wildcard() {
            self.wildcards.retain(|x| *x != id);
        } else if !entry.is_comment() {
            self.buckets[bucket_of(entry.hash())].retain(|x| *x != id);
        }
        debug_assert!(!self.order.contains(&id), "removed entry still ordered");
        self.vacant.push(id.0);
        Some(entry)
    }

    /// Detach and remove an entry, returning its former position.
    pub fn delete(&mut self, id: EntryId) -> Option<usize> {
        let position = self.detach(id);
        self.remove(id);
        position
    }

    /// Find the newest non-wildcard entry whose key equals `key`
    /// (case-insensitive).
    #[must_use]
    pub fn lookup_exact(&self, key: &str) -> Option<EntryId> {
        let hashed = hash_key(key, Some(':'));
        if hashed.is_empty() {
            return None;
        }
        self.buckets[bucket_of(hashed.hash)]
            .iter()
            .rev()
            .copied()
            .find(|id| self.get(*id).is_some_and(|e| e.key() == hashed.folded))
    }

    /// Find the newest entry whose key equals `key` literally, wildcard
    /// characters included.
    ///
    /// Plain keys come from the exact index, keys holding `*` or `?` from
    /// the wildcard list. Patterns are not matched against each other.
    #[must_use]
    pub fn lookup_literal(&self, key: &str) -> Option<EntryId> {
        let hashed = hash_key(key, Some(':'));
        if !is_wildcard(&hashed.folded) {
            return self.lookup_exact(key);
        }
        self.wildcards
            .iter()
            .rev()
            .copied()
            .find(|id| self.get(*id).is_some_and(|e| e.key() == hashed.folded))
    }

    /// Find an entry for `key`, falling back to the best wildcard pattern.
    ///
    /// # Arguments
    ///
    /// * `key` - Key to look up, any letter case
    /// * `allow_wildcard` - Consult wildcard entries when no exact entry
    ///   exists
    ///
    /// # Returns
    ///
    /// The exact entry if there is one, else the wildcard entry with the
    /// strictly highest match score. On equal scores the newest pattern wins.
    #[must_use]
    pub fn lookup(&self, key: &str, allow_wildcard: bool) -> Option<EntryId> {
        if let Some(id) = self.lookup_exact(key) {
            return Some(id);
        }
        if !allow_wildcard {
            return None;
        }

        let hashed = hash_key(key, Some(':'));
        if hashed.is_empty() {
            return None;
        }

        let mut best = None;
        let mut best_score = 0;
        for id in self.wildcards.iter().rev().copied() {
            let Some(entry) = self.get(id) else { continue };
            let score = xrm_match(&hashed.folded, entry.key());
            if score > best_score {
                best = Some(id);
                best_score = score;
            }
        }
        if let Some(id) = best {
            log::trace!("wildcard match for {}: score {}", hashed.folded, best_score);
            return Some(id);
        }
        None
    }

    /// Find the next entry with key `key` after position `seek`.
    ///
    /// Positions are 1-based; pass 0 to start at the top. Duplicate keys
    /// (and wildcard keys written literally) are returned one at a time in
    /// file order.
    ///
    /// # Returns
    ///
    /// The entry, if any, and the position to pass to the next call. When
    /// nothing is found the position is returned unchanged.
    #[must_use]
    pub fn lookup_by_position(&self, key: &str, seek: usize) -> (Option<EntryId>, usize) {
        let hashed = hash_key(key, Some(':'));
        if hashed.is_empty() {
            return (None, seek);
        }
        for (index, id) in self.order.iter().enumerate().skip(seek) {
            let Some(entry) = self.get(*id) else { continue };
            if entry.hash() == hashed.hash && entry.key() == hashed.folded {
                return (Some(*id), index + 1);
            }
        }
        (None, seek)
    }

    /// Serialize the entries in file order.
    ///
    /// Comments are written verbatim; keyed entries as `raw_key: value`.
    /// With `tabify`, values start at the next multiple of four columns past
    /// the longest key.
    #[must_use]
    pub fn render(&self, tabify: bool, eol: &str) -> String {
        let width = if tabify {
            let longest = self.iter().map(|e| e.key().len() + 1).max().unwrap_or(0);
            (longest + 4) & !3
        } else {
            0
        };

        let mut out = String::new();
        for entry in self.iter() {
            if entry.is_comment() {
                out.push_str(entry.value());
            } else {
                let used = entry.key().len() + 1;
                let pad = width.saturating_sub(used).max(1);
                out.push_str(entry.raw_key());
                out.push(':');
                out.extend(std::iter::repeat(' ').take(pad));
                out.push_str(entry.value());
            }
            out.push_str(eol);
        }
        out
    }

    /// Clear the dirty flag of every entry.
    pub fn mark_all_clean(&mut self) {
        for entry in self.slots.iter_mut().flatten() {
            entry.mark_clean();
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

fn bucket_of(hash: u32) -> usize {
    hash as usize % BUCKET_COUNT
}

/// Split a data line into key and value, or `None` if it is not one.
fn split_key_value(text: &str) -> Option<(&str, &str)> {
    let colon = text.find(':')?;
    let key = text[..colon].trim_end_matches(|c: char| c <= ' ');
    if key.is_empty() || key.len() >= MAX_KEYWORD_LENGTH {
        return None;
    }
    let value = text[colon + 1..].trim_start_matches(' ');
    Some((key, value))
}
