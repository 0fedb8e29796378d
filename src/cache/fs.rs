//! Filesystem access used by the cache.
//!
//! The cache never touches `std::fs` directly; it goes through the
//! [`FileSystem`] trait so that embedders can redirect storage and tests can
//! simulate failures. [`OsFileSystem`] is the real implementation and
//! [`MemoryFileSystem`] keeps everything in memory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

/// Whole-file operations needed by the resource cache.
pub trait FileSystem {
    /// Read a file completely.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the file does not exist.
    fn read_whole_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Last modification time, `Ok(None)` when the file does not exist.
    fn modified_time(&self, path: &Path) -> io::Result<Option<SystemTime>>;

    /// Replace the file's contents, creating parent directories as needed.
    fn write_whole_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Whether the file exists.
    fn file_exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_whole_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn modified_time(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        match fs::metadata(path) {
            Ok(meta) => meta.modified().map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_whole_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to a sibling temp file, then rename over the target
        let temp_path = temp_path_for(path);
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(contents)?;
            file.flush()?;
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("rc"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<PathBuf, (Vec<u8>, SystemTime)>,
    clock: u64,
    fail_writes: bool,
    writes: usize,
}

/// In-memory filesystem.
///
/// Clones share the same storage, so a caller can hand one clone to a cache
/// and inspect the files through another. Every write advances a private
/// clock by one second, which gives each write a distinct modification time.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryFileSystem {
    /// Create an empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file as if written by another program.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let mut state = self.state.borrow_mut();
        let stamp = state.tick();
        state.files.insert(path.into(), (contents.into(), stamp));
    }

    /// Contents of a file as UTF-8 text, if it exists.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.state
            .borrow()
            .files
            .get(path)
            .map(|(bytes, _)| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Raw contents of a file, if it exists.
    #[must_use]
    pub fn bytes(&self, path: &Path) -> Option<Vec<u8>> {
        self.state
            .borrow()
            .files
            .get(path)
            .map(|(bytes, _)| bytes.clone())
    }

    /// Make every following write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }
}

impl MemoryState {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.clock)
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_whole_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        Ok(self
            .state
            .borrow()
            .files
            .get(path)
            .map(|(bytes, _)| bytes.clone()))
    }

    fn modified_time(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        Ok(self.state.borrow().files.get(path).map(|(_, stamp)| *stamp))
    }

    fn write_whole_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "writes disabled",
            ));
        }
        let stamp = state.tick();
        state
            .files
            .insert(path.to_path_buf(), (contents.to_vec(), stamp));
        state.writes += 1;
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.state.borrow().files.contains_key(path)
    }
}
