//! The resource store: keyed reads and writes over cached files.
//!
//! # Overview
//!
//! [`RcStore`] is the entry point for callers. Every operation names a file
//! path and a key; the file is loaded into the cache on first use and kept
//! there. Writes change the in-memory file and mark it dirty. Dirty files
//! are written back on [`RcStore::flush`], [`RcStore::reset_all`], when
//! evicted from a bounded cache, when the store is dropped, or right away
//! with write-through enabled.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use rcdb::api::{RcStore, StoreOptions};
//! use rcdb::cache::MemoryFileSystem;
//!
//! let fs = MemoryFileSystem::new();
//! fs.insert("blackbox.rc", "session.screen0.toolbar.onTop: false\n*.font: Tahoma\n");
//!
//! let mut store = RcStore::with_file_system(Box::new(fs.clone()), StoreOptions::default());
//! let rc = Path::new("blackbox.rc");
//!
//! assert_eq!(store.read(rc, "Session.Screen0.Toolbar.OnTop").unwrap(), Some("false"));
//! assert_eq!(store.read(rc, "menu.font").unwrap(), Some("Tahoma"));
//!
//! store.write(rc, "session.screen0.toolbar.onTop", Some("true")).unwrap();
//! store.flush().unwrap();
//! assert!(fs.contents(rc).unwrap().starts_with("session.screen0.toolbar.onTop: true"));
//! ```

use std::path::Path;

use crate::cache::{
    CacheConfig, CacheError, FileCache, FileSystem, OsFileSystem, RcFile, SchemaVariant,
};
use crate::matcher::{best_insertion_point, xrm_match};
use crate::parse::{hash_key, is_blank};
use crate::store::{Entry, EntryId, MAX_KEYWORD_LENGTH};

use super::translate::lookup_legacy;
use super::{StoreError, StoreResult};

/// Number of leading bytes inspected by [`RcStore::looks_like_style_file`].
const STYLE_SNIFF_LEN: usize = 10_000;

/// Minimum normalized Levenshtein similarity for a key suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Behaviour switches of an [`RcStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Cache policy and file format.
    pub cache: CacheConfig,
    /// Retry missed reads in style files with legacy key translation.
    pub translate_legacy_keys: bool,
    /// Write a file back after every change instead of deferring.
    pub write_through: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            translate_legacy_keys: true,
            write_through: false,
        }
    }
}

/// Keyed access to resource files.
#[derive(Debug)]
pub struct RcStore {
    cache: FileCache,
    translate_legacy_keys: bool,
    write_through: bool,
}

impl RcStore {
    /// Create a store over the real filesystem.
    #[must_use]
    pub fn new(options: StoreOptions) -> Self {
        Self::with_file_system(Box::new(OsFileSystem), options)
    }

    /// Create a store over a custom filesystem.
    #[must_use]
    pub fn with_file_system(fs: Box<dyn FileSystem>, options: StoreOptions) -> Self {
        Self {
            cache: FileCache::new(fs, options.cache),
            translate_legacy_keys: options.translate_legacy_keys,
            write_through: options.write_through,
        }
    }

    /// The underlying file cache.
    #[must_use]
    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Read the value of `key`, falling back to wildcard entries.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file exists but cannot be read.
    pub fn read(&mut self, path: &Path, key: &str) -> StoreResult<Option<&str>> {
        self.read_value(path, key, None)
    }

    /// Read the value of `key`, optionally stepping through duplicates.
    ///
    /// # Arguments
    ///
    /// * `path` - Resource file
    /// * `key` - Key in any letter case
    /// * `seek` - When given, the search starts after this 1-based position
    ///   and is updated to the position of the entry found. Only exact key
    ///   matches are returned in this mode, in file order.
    ///
    /// # Returns
    ///
    /// The value, or `None` if the key is absent. A missed non-positional
    /// read in a style file is retried with the legacy key translation.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file exists but cannot be read.
    pub fn read_value(
        &mut self,
        path: &Path,
        key: &str,
        seek: Option<&mut usize>,
    ) -> StoreResult<Option<&str>> {
        let translate = self.translate_legacy_keys;
        let file: &RcFile = self.cache.get(path)?;
        let store = file.store();

        let found = match seek {
            Some(position) => {
                let (id, next) = store.lookup_by_position(key, *position);
                *position = next;
                id
            }
            None => store.lookup(key, true).or_else(|| {
                if translate && file.is_style() {
                    lookup_legacy(store, key)
                } else {
                    None
                }
            }),
        };

        log::trace!(
            "read {}:{} -> {}",
            path.display(),
            key,
            if found.is_some() { "hit" } else { "miss" }
        );
        Ok(found.map(|id| store.value(id)))
    }

    /// Set, replace or remove the value of `key`.
    ///
    /// # Arguments
    ///
    /// * `path` - Resource file, created on write-back if missing
    /// * `key` - Exact key; wildcard characters are taken literally, so
    ///   `*.font` replaces or removes the `*.font` line itself
    /// * `value` - New value, or `None` to remove the key
    ///
    /// An existing entry is replaced in place. A new key in an existing file
    /// is placed after the most similar group of keys, or appended.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidKey`] for a key that would not read back as
    /// itself, [`StoreError::InvalidValue`] for a value holding a line break
    /// or a character the file's encoding lacks, or a cache error when the
    /// file cannot be read (or written, with write-through).
    pub fn write(&mut self, path: &Path, key: &str, value: Option<&str>) -> StoreResult<()> {
        let hashed = hash_key(key, Some(':'));
        let raw_key = &key[..hashed.len()];
        validate_key(key, raw_key)?;
        if let Some(value) = value {
            validate_value(key, value)?;
        }

        let file = self.cache.get(path)?;
        if value.is_some() {
            check_encodable(file, key, raw_key, value)?;
        }
        let is_new_file = file.is_new_file();
        let existing = file.store().lookup_literal(key);

        if let (Some(id), Some(value)) = (existing, value) {
            if file.store().value(id) == value {
                // Same value: only refresh the stored letter case
                if let Some(entry) = file.store_mut().get_mut(id) {
                    if entry.raw_key() != raw_key {
                        entry.set_raw_key(raw_key);
                        entry.mark_dirty();
                    }
                }
                return Ok(());
            }
        }
        if existing.is_none() && value.is_none() {
            return Ok(());
        }

        let store = file.store_mut();
        let mut position = existing.and_then(|id| store.delete(id));
        if let Some(value) = value {
            let id = store.insert(raw_key, value);
            if let Some(entry) = store.get_mut(id) {
                entry.mark_dirty();
            }
            if existing.is_none() && !is_new_file {
                position = best_insertion_point(store.iter().map(Entry::key), &hashed.folded)
                    .map(|after| after + 1);
            }
            match position {
                Some(position) => store.insert_at(position, id),
                None => store.push(id),
            }
        }
        file.mark_dirty();
        log::debug!("write {}:{}", path.display(), hashed.folded);

        self.after_change(path)
    }

    /// Rename or delete keys.
    ///
    /// With `new_key`, every entry whose key equals `key` is replaced in
    /// place by `new_key` with the same value. Without, every entry matched
    /// by `key` as a wildcard pattern is removed; `*` removes everything,
    /// comments included. A trailing `*` matches zero components, so
    /// deleting `menu.*` also removes a bare `menu` key.
    ///
    /// # Returns
    ///
    /// Whether anything changed.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidKey`] for an invalid `new_key`, or a cache error.
    pub fn rename(&mut self, path: &Path, key: &str, new_key: Option<&str>) -> StoreResult<bool> {
        let hashed = hash_key(key, Some(':'));
        if hashed.is_empty() {
            return Ok(false);
        }
        let new_key = match new_key {
            Some(new_key) => {
                let raw = &new_key[..hash_key(new_key, Some(':')).len()];
                validate_key(new_key, raw)?;
                Some(raw)
            }
            None => None,
        };

        let file = self.cache.get(path)?;
        if let Some(raw) = new_key {
            check_encodable(file, raw, raw, None)?;
        }
        let store = file.store_mut();
        let ids: Vec<EntryId> = store.ids().to_vec();
        let mut changed = 0usize;

        for id in ids {
            let Some(entry) = store.get(id) else { continue };
            match new_key {
                Some(new_key) => {
                    if entry.key() != hashed.folded {
                        continue;
                    }
                    let value = entry.value().to_string();
                    let position = store.delete(id).unwrap_or(usize::MAX);
                    let renamed = store.insert(new_key, &value);
                    store.insert_at(position, renamed);
                }
                None => {
                    let matched = hashed.folded == "*" || xrm_match(entry.key(), &hashed.folded) > 0;
                    if !matched {
                        continue;
                    }
                    store.delete(id);
                }
            }
            changed += 1;
        }

        if changed == 0 {
            return Ok(false);
        }
        file.mark_dirty();
        log::debug!(
            "{} {} entries for {} in {}",
            if new_key.is_some() { "renamed" } else { "deleted" },
            changed,
            hashed.folded,
            path.display()
        );
        self.after_change(path)?;
        Ok(true)
    }

    /// Remove every entry matched by the pattern `key`.
    ///
    /// # Errors
    ///
    /// See [`RcStore::rename`].
    pub fn delete(&mut self, path: &Path, key: &str) -> StoreResult<bool> {
        self.rename(path, key, None)
    }

    fn after_change(&mut self, path: &Path) -> StoreResult<()> {
        if self.write_through {
            self.cache.write_back(path)?;
        }
        Ok(())
    }

    /// Write back every dirty file, keeping the cache.
    ///
    /// # Errors
    ///
    /// A cache error naming how many files could not be written.
    pub fn flush(&mut self) -> StoreResult<()> {
        Ok(self.cache.flush()?)
    }

    /// Write back every dirty file and empty the cache.
    ///
    /// # Errors
    ///
    /// A cache error naming how many files could not be written; those
    /// files stay cached.
    pub fn reset_all(&mut self) -> StoreResult<()> {
        Ok(self.cache.reset_all()?)
    }

    /// The cached file at `path`, loading it if needed.
    ///
    /// # Errors
    ///
    /// A cache error when the file cannot be read.
    pub fn file(&mut self, path: &Path) -> StoreResult<&RcFile> {
        Ok(self.cache.get(path)?)
    }

    /// Kind of resource file at `path`.
    ///
    /// # Errors
    ///
    /// A cache error when the file cannot be read.
    pub fn schema(&mut self, path: &Path) -> StoreResult<SchemaVariant> {
        Ok(self.cache.get(path)?.schema())
    }

    /// Whether `path` is a style using the `*.appearance` key names.
    ///
    /// # Errors
    ///
    /// A cache error when the file cannot be read.
    pub fn is_style_070(&mut self, path: &Path) -> StoreResult<bool> {
        Ok(self.cache.get(path)?.uses_new_convention())
    }

    /// Align values in columns when `path` is written back.
    ///
    /// # Errors
    ///
    /// A cache error when the file cannot be read.
    pub fn set_tabify(&mut self, path: &Path, tabify: bool) -> StoreResult<()> {
        self.cache.get(path)?.set_tabify(tabify);
        Ok(())
    }

    /// Keys of `path` that look like `key`, best match first.
    ///
    /// # Errors
    ///
    /// A cache error when the file cannot be read.
    pub fn suggest_keys(&mut self, path: &Path, key: &str, limit: usize) -> StoreResult<Vec<String>> {
        let wanted = hash_key(key, Some(':')).folded;
        let file = self.cache.get(path)?;

        let mut scored: Vec<(f64, &str)> = file
            .store()
            .iter()
            .filter(|e| !e.is_comment())
            .map(|e| (strsim::normalized_levenshtein(&wanted, e.key()), e.raw_key()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut keys: Vec<String> = Vec::new();
        for (_, raw_key) in scored {
            if keys.len() == limit {
                break;
            }
            if !keys.iter().any(|k| k.eq_ignore_ascii_case(raw_key)) {
                keys.push(raw_key.to_string());
            }
        }
        Ok(keys)
    }

    /// Whether the file at `path` looks like a style, judged by the text
    /// `menu.frame` near its start. The file is not cached.
    ///
    /// # Errors
    ///
    /// A cache error when the file exists but cannot be read.
    pub fn looks_like_style_file(&self, path: &Path) -> StoreResult<bool> {
        let bytes = self
            .cache
            .file_system()
            .read_whole_file(path)
            .map_err(|source| CacheError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(bytes.is_some_and(|bytes| {
            let head = &bytes[..bytes.len().min(STYLE_SNIFF_LEN)];
            String::from_utf8_lossy(head)
                .to_ascii_lowercase()
                .contains("menu.frame")
        }))
    }
}

impl Drop for RcStore {
    fn drop(&mut self) {
        if let Err(e) = self.cache.flush() {
            log::warn!("Unsaved resource changes lost: {}", e);
        }
    }
}

/// Reject keys that a reload would read as a comment or a different key.
///
/// `raw_key` is `key` up to its first `:`.
fn validate_key(key: &str, raw_key: &str) -> StoreResult<()> {
    let valid = !raw_key.is_empty()
        && raw_key.len() < MAX_KEYWORD_LENGTH
        && !raw_key.starts_with(['#', '!'])
        && !raw_key.bytes().next().is_some_and(is_blank)
        && !raw_key.bytes().last().is_some_and(is_blank)
        && !raw_key.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

fn validate_value(key: &str, value: &str) -> StoreResult<()> {
    if value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidValue {
            key: key.to_string(),
            reason: "line breaks are not allowed",
        });
    }
    Ok(())
}

fn check_encodable(file: &RcFile, key: &str, raw_key: &str, value: Option<&str>) -> StoreResult<()> {
    let encoding = file.encoding();
    if !encoding.can_encode(raw_key) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    if value.is_some_and(|v| !encoding.can_encode(v)) {
        return Err(StoreError::InvalidValue {
            key: key.to_string(),
            reason: "not representable in the file's 8-bit encoding",
        });
    }
    Ok(())
}
