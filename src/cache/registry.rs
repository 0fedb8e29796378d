//! The per-process table of cached resource files.
//!
//! # Overview
//!
//! [`FileCache`] maps normalized paths to [`RcFile`]s. Files are loaded on
//! first use and kept in most-recently-used order. Two optional policies
//! bound what the cache holds:
//!
//! - **Revalidation**: on a hit, once the recheck interval has passed since
//!   the last check, a clean file whose on-disk modification time changed is
//!   discarded and read again.
//! - **Capacity**: after loading a file, non-style files beyond the first
//!   `capacity` positions are evicted, written back first when dirty.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use rcdb::cache::{CacheConfig, FileCache, MemoryFileSystem};
//!
//! let fs = MemoryFileSystem::new();
//! fs.insert("menu.rc", "menu.frame: bevel1\n");
//!
//! let mut cache = FileCache::new(Box::new(fs), CacheConfig::default());
//! let file = cache.get(Path::new("MENU.RC")).unwrap();
//! assert_eq!(file.store().len(), 1);
//! assert!(cache.contains(Path::new("menu.rc")));
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use crate::parse::ScanOptions;

use super::file::{LineEnding, RcFile};
use super::fs::FileSystem;
use super::path::normalize_path;
use super::CacheError;

/// Default number of files kept when the cache is bounded.
pub const DEFAULT_CAPACITY: usize = 4;

/// Default minimum time between two modification-time checks of a file.
pub const DEFAULT_RECHECK_INTERVAL: Duration = Duration::from_millis(20);

/// Cache policy and file format settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of non-style files kept; `None` for no limit.
    pub capacity: Option<usize>,
    /// Minimum time between mtime checks; `None` disables revalidation.
    pub recheck_interval: Option<Duration>,
    /// Terminator for written lines.
    pub line_ending: LineEnding,
    /// Initial tabify setting of newly loaded files.
    pub tabify: bool,
    /// Line scanning options.
    pub scan: ScanOptions,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_CAPACITY),
            recheck_interval: Some(DEFAULT_RECHECK_INTERVAL),
            line_ending: LineEnding::default(),
            tabify: false,
            scan: ScanOptions::default(),
        }
    }
}

/// Cache of loaded resource files, most recently used first.
pub struct FileCache {
    files: Vec<RcFile>,
    fs: Box<dyn FileSystem>,
    config: CacheConfig,
}

impl std::fmt::Debug for FileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCache")
            .field("files", &self.files.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FileCache {
    /// Create an empty cache over `fs`.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, config: CacheConfig) -> Self {
        Self {
            files: Vec::new(),
            fs,
            config,
        }
    }

    /// The cache settings.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The filesystem files are read from and written to.
    #[must_use]
    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Cached files, most recently used first.
    pub fn files(&self) -> impl Iterator<Item = &RcFile> + '_ {
        self.files.iter()
    }

    /// Whether `path` is cached, without loading or reordering anything.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        let key = normalize_path(path);
        self.files.iter().any(|f| *f.key() == key)
    }

    /// Get the cached file for `path`, loading it if necessary.
    ///
    /// # Arguments
    ///
    /// * `path` - File path; case and Unicode normalization do not matter
    ///
    /// # Returns
    ///
    /// The file, now at the most-recently-used position.
    ///
    /// # Errors
    ///
    /// [`CacheError::Read`] when the file exists but cannot be read.
    pub fn get(&mut self, path: &Path) -> Result<&mut RcFile, CacheError> {
        let key = normalize_path(path);
        let found = self
            .files
            .iter()
            .position(|f| f.key().hash == key.hash && f.key().text == key.text);

        if let Some(index) = found {
            if self.changed_on_disk(index) {
                let stale = self.files.remove(index);
                log::debug!("{} changed on disk, reloading", stale.path().display());
                return self.load_front(stale.path());
            }
            if index > 0 {
                let file = self.files.remove(index);
                self.files.insert(0, file);
            }
            return Ok(&mut self.files[0]);
        }

        self.load_front(path)
    }

    fn changed_on_disk(&mut self, index: usize) -> bool {
        let Some(interval) = self.config.recheck_interval else {
            return false;
        };
        let file = &mut self.files[index];
        if file.is_dirty() {
            return false;
        }
        let now = Instant::now();
        if now.duration_since(file.last_checked_at()) < interval {
            return false;
        }
        file.touch_checked(now);

        match self.fs.modified_time(file.path()) {
            Ok(mtime) => mtime != file.modified_at(),
            Err(e) => {
                log::debug!("Cannot stat {}: {}", file.path().display(), e);
                false
            }
        }
    }

    fn load_front(&mut self, path: &Path) -> Result<&mut RcFile, CacheError> {
        let file = RcFile::load(path, self.fs.as_ref(), &self.config)?;
        self.files.insert(0, file);
        self.evict();
        Ok(&mut self.files[0])
    }

    /// Drop non-style files past the capacity limit.
    fn evict(&mut self) {
        let Some(capacity) = self.config.capacity else {
            return;
        };
        // The file just loaded at the front always stays
        let capacity = capacity.max(1);
        let mut index = self.files.len();
        while index > capacity {
            index -= 1;
            let file = &mut self.files[index];
            if file.is_style() {
                continue;
            }
            if file.is_dirty() {
                if let Err(e) = file.write_back(self.fs.as_ref()) {
                    log::warn!("Keeping {} in cache: {}", file.path().display(), e);
                    continue;
                }
            }
            let file = self.files.remove(index);
            log::debug!("Evicted {}", file.path().display());
        }
    }

    /// Write one cached file back if it is dirty.
    ///
    /// # Errors
    ///
    /// [`CacheError::Write`] when the write fails; the file stays dirty.
    pub fn write_back(&mut self, path: &Path) -> Result<(), CacheError> {
        let key = normalize_path(path);
        let fs = self.fs.as_ref();
        match self.files.iter_mut().find(|f| *f.key() == key) {
            Some(file) if file.is_dirty() => file.write_back(fs),
            _ => Ok(()),
        }
    }

    /// Write back every dirty file.
    ///
    /// # Errors
    ///
    /// [`CacheError::Persist`] when at least one file could not be written;
    /// those files stay dirty.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        let mut failed = Vec::new();
        for file in self.files.iter_mut().filter(|f| f.is_dirty()) {
            if let Err(e) = file.write_back(self.fs.as_ref()) {
                log::warn!("{}", e);
                failed.push(file.path().to_path_buf());
            }
        }
        match failed.first() {
            None => Ok(()),
            Some(first) => Err(CacheError::Persist {
                count: failed.len(),
                first: first.clone(),
            }),
        }
    }

    /// Write back every dirty file and empty the cache.
    ///
    /// Files that cannot be written stay cached so that no change is lost.
    ///
    /// # Errors
    ///
    /// [`CacheError::Persist`] when at least one file could not be written.
    pub fn reset_all(&mut self) -> Result<(), CacheError> {
        let result = self.flush();
        self.files.retain(RcFile::is_dirty);
        log::debug!("Cache reset, {} file(s) kept", self.files.len());
        result
    }
}
