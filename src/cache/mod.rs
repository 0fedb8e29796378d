//! Resource-file cache.
//!
//! This module keeps parsed resource files in memory, tracks unsaved
//! changes and writes them back.
//!
//! # Architecture
//!
//! * [`fs`]: The [`FileSystem`] seam with the OS and in-memory implementations.
//! * [`path`]: Normalized path keys used for cache equality.
//! * [`encoding`]: UTF-8 or byte-per-character decoding of file contents.
//! * [`file`]: [`RcFile`], one parsed file with its dirty state and schema.
//! * [`registry`]: [`FileCache`], the MRU-ordered table with revalidation and
//!   capacity-bounded eviction.
//!
//! # Cache Invalidation
//!
//! A cached file is reloaded when, on a lookup at least the recheck interval
//! after its previous check, its modification time on disk differs from the
//! one recorded at load or write-back. Dirty files are never reloaded.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub mod encoding;
pub mod file;
pub mod fs;
pub mod path;
pub mod registry;

pub use encoding::TextEncoding;
pub use file::{LineEnding, RcFile, SchemaVariant};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use path::{normalize_path, PathKey};
pub use registry::{CacheConfig, FileCache, DEFAULT_CAPACITY, DEFAULT_RECHECK_INTERVAL};

/// Errors raised while loading or writing resource files.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be written back.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Some dirty files could not be written back and are still cached.
    #[error("{count} file(s) could not be written back, starting with {first}")]
    Persist { count: usize, first: PathBuf },
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
