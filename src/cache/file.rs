//! A cached resource file.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use serde::{Deserialize, Serialize};

use crate::store::LineStore;

use super::encoding::TextEncoding;
use super::fs::FileSystem;
use super::path::{normalize_path, PathKey};
use super::registry::CacheConfig;
use super::CacheError;

/// Line terminator used when writing files back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    /// The terminator text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// What kind of resource file a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// Plain settings file.
    Settings,
    /// Style file using the old flat key names.
    LegacyStyle,
    /// Style file using the `*.appearance` key names.
    Style,
}

impl SchemaVariant {
    /// Classify a file from its entries.
    ///
    /// A file is a style when any key or value mentions `gradient` or
    /// `solid` (any case). A style uses the new convention when some key
    /// ends in `.appearance`.
    #[must_use]
    pub fn classify(store: &LineStore) -> Self {
        let is_style = store
            .iter()
            .any(|e| mentions_texture(e.key()) || mentions_texture(e.value()));
        if !is_style {
            return Self::Settings;
        }
        if store.iter().any(|e| e.key().ends_with(".appearance")) {
            Self::Style
        } else {
            Self::LegacyStyle
        }
    }

    /// Whether the file is a style.
    #[must_use]
    pub fn is_style(self) -> bool {
        !matches!(self, Self::Settings)
    }

    /// Whether the style uses `*.appearance` keys.
    #[must_use]
    pub fn uses_new_convention(self) -> bool {
        matches!(self, Self::Style)
    }
}

fn mentions_texture(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains("gradient") || lower.contains("solid")
}

/// One resource file held in the cache.
#[derive(Debug, Clone)]
pub struct RcFile {
    path: PathBuf,
    key: PathKey,
    store: LineStore,
    dirty: bool,
    is_new_file: bool,
    tabify: bool,
    line_ending: LineEnding,
    encoding: TextEncoding,
    schema: SchemaVariant,
    last_checked_at: Instant,
    modified_at: Option<SystemTime>,
}

impl RcFile {
    /// Read and parse a file.
    ///
    /// A missing file yields an empty file flagged as new. Contents that are
    /// not valid UTF-8 are decoded one byte per character and encoded the
    /// same way on write-back.
    ///
    /// # Errors
    ///
    /// [`CacheError::Read`] when the file exists but cannot be read.
    pub fn load(
        path: &Path,
        fs: &dyn FileSystem,
        config: &CacheConfig,
    ) -> Result<Self, CacheError> {
        let read_err = |source| CacheError::Read {
            path: path.to_path_buf(),
            source,
        };
        let modified_at = fs.modified_time(path).map_err(read_err)?;
        let bytes = fs.read_whole_file(path).map_err(read_err)?;

        let is_new_file = bytes.is_none();
        let (store, encoding) = match bytes {
            Some(bytes) => {
                let (text, encoding) = TextEncoding::decode(bytes);
                (LineStore::parse(&text, config.scan), encoding)
            }
            None => (LineStore::new(), TextEncoding::Utf8),
        };
        let schema = SchemaVariant::classify(&store);

        log::debug!(
            "Loaded {} ({} lines, {:?}, {:?}{})",
            path.display(),
            store.len(),
            schema,
            encoding,
            if is_new_file { ", new" } else { "" }
        );

        Ok(Self {
            path: path.to_path_buf(),
            key: normalize_path(path),
            store,
            dirty: false,
            is_new_file,
            tabify: config.tabify,
            line_ending: config.line_ending,
            encoding,
            schema,
            last_checked_at: Instant::now(),
            modified_at,
        })
    }

    /// Path as first requested.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized cache key.
    #[must_use]
    pub fn key(&self) -> &PathKey {
        &self.key
    }

    /// The file's entries.
    #[must_use]
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Mutable access to the entries. Callers mark the file dirty.
    pub fn store_mut(&mut self) -> &mut LineStore {
        &mut self.store
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the file did not exist when loaded and was not yet written.
    #[must_use]
    pub fn is_new_file(&self) -> bool {
        self.is_new_file
    }

    /// Whether values are aligned on write-back.
    #[must_use]
    pub fn tabify(&self) -> bool {
        self.tabify
    }

    /// Align values on write-back.
    pub fn set_tabify(&mut self, tabify: bool) {
        self.tabify = tabify;
    }

    /// Encoding the file was read with and will be written with.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Schema computed when the file was loaded.
    #[must_use]
    pub fn schema(&self) -> SchemaVariant {
        self.schema
    }

    /// Whether the file is a style. Style files are never evicted.
    #[must_use]
    pub fn is_style(&self) -> bool {
        self.schema.is_style()
    }

    /// Whether the style uses `*.appearance` keys.
    #[must_use]
    pub fn uses_new_convention(&self) -> bool {
        self.schema.uses_new_convention()
    }

    /// Modification time seen at the last load or write.
    #[must_use]
    pub fn modified_at(&self) -> Option<SystemTime> {
        self.modified_at
    }

    pub(crate) fn last_checked_at(&self) -> Instant {
        self.last_checked_at
    }

    pub(crate) fn touch_checked(&mut self, now: Instant) {
        self.last_checked_at = now;
    }

    /// Serialize the file as it would be written.
    #[must_use]
    pub fn render(&self) -> String {
        self.store.render(self.tabify, self.line_ending.as_str())
    }

    /// Write the file to disk.
    ///
    /// On success the file is clean, no longer new and remembers the new
    /// modification time.
    ///
    /// # Errors
    ///
    /// [`CacheError::Write`] when the text cannot be encoded or the
    /// filesystem rejects the write; the file stays dirty.
    pub fn write_back(&mut self, fs: &dyn FileSystem) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };
        let bytes = self.encoding.encode(&self.render()).map_err(|c| {
            write_err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("character {c:?} cannot be written as {:?}", self.encoding),
            ))
        })?;
        fs.write_whole_file(&self.path, &bytes).map_err(write_err)?;

        self.dirty = false;
        self.is_new_file = false;
        self.store.mark_all_clean();
        self.modified_at = fs.modified_time(&self.path).ok().flatten();
        self.last_checked_at = Instant::now();
        log::debug!("Wrote {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }
}
