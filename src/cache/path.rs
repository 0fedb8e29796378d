//! Cache keys for resource-file paths.
//!
//! Two spellings of a path refer to the same cached file when they agree
//! after ASCII case folding and Unicode NFC normalization. The latter
//! matters on macOS, where the filesystem hands out decomposed (NFD) names:
//!
//! - NFC: `café.rc` - 'é' is U+00E9 (single code point)
//! - NFD: `café.rc` - 'e' U+0065 + combining acute accent U+0301
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use rcdb::cache::path::{normalize_path, paths_equal};
//!
//! let key = normalize_path(Path::new("Styles/Café.rc"));
//! assert_eq!(key.text, "styles/café.rc");
//! assert!(paths_equal(Path::new("STYLES/cafe\u{0301}.rc"), Path::new("styles/café.rc")));
//! ```

use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::parse::fold_hash;

/// Normalized form of a path, used to find a file in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    /// NFC-normalized, ASCII-lower-cased path text.
    pub text: String,
    /// Hash of `text`, compared before the text itself.
    pub hash: u32,
}

/// Normalize a path for cache lookups.
///
/// Paths that are not valid UTF-8 are converted lossily first; the result
/// only serves as a lookup key, the original path is kept for I/O.
///
/// # Arguments
///
/// * `path` - Path as given by the caller
///
/// # Returns
///
/// The folded text together with its hash.
#[must_use]
pub fn normalize_path(path: &Path) -> PathKey {
    let text: String = path.to_string_lossy().nfc().collect::<String>().to_ascii_lowercase();
    let hash = fold_hash(text.as_bytes());
    PathKey { text, hash }
}

/// Check if two paths name the same cached file.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    normalize_path(a) == normalize_path(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_ascii_case() {
        let a = normalize_path(Path::new("C:/Blackbox/Blackbox.rc"));
        let b = normalize_path(Path::new("c:/blackbox/BLACKBOX.RC"));
        assert_eq!(a, b);
        assert_eq!(a.text, "c:/blackbox/blackbox.rc");
    }

    #[test]
    fn test_normalize_nfd_to_nfc() {
        let nfd = normalize_path(Path::new("styles/cafe\u{0301}.rc"));
        assert_eq!(nfd.text, "styles/caf\u{e9}.rc");
    }

    #[test]
    fn test_non_ascii_case_is_kept() {
        // Only ASCII letters fold
        assert!(!paths_equal(Path::new("\u{c4}.rc"), Path::new("\u{e4}.rc")));
    }

    #[test]
    fn test_different_paths() {
        assert!(!paths_equal(Path::new("a.rc"), Path::new("b.rc")));
    }
}
