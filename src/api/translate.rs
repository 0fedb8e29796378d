//! Legacy style key translation.
//!
//! Older plugins query style files with flat keys such as `toolbar.color`
//! or `menu.frame.colorTo`. Newer styles describe each item with an
//! `*.appearance` key plus `color1`/`color2`/`backgroundColor` etc. When a
//! read misses in a style file, the key is rewritten with the table below
//! and looked up again.
//!
//! Two kinds of rewrite exist. Item keys (`toolbar`, `*.label`, `*.frame`,
//! ...) get `.appearance` appended. Property keys have their last component
//! replaced (`*.colorTo` becomes `*.color2`). A plain `*.color` is
//! ambiguous: it means `color1` for gradients and `backgroundColor` for
//! solid textures, so it is resolved against the item's appearance.
//!
//! # Example
//!
//! ```
//! use rcdb::api::translate::translate_legacy_key;
//!
//! let t = translate_legacy_key("Toolbar.Label").unwrap();
//! assert_eq!(t.key, "toolbar.label.appearance");
//!
//! let t = translate_legacy_key("menu.frame.colorTo").unwrap();
//! assert_eq!(t.key, "menu.frame.color2");
//!
//! assert!(translate_legacy_key("session.screen0.workspaces").is_none());
//! ```

use crate::store::LineStore;

/// Item keys that gain an `.appearance` suffix. A leading `^` means the
/// pattern must be the whole key; otherwise it must be the last component.
const ITEM_SUFFIXES: &[&str] = &[
    "^toolbar",
    "^slit",
    "windowlabel",
    "clock",
    "label",
    "button",
    "pressed",
    "frame",
    "title",
    "active",
    "focus",
    "unfocus",
];

/// Property keys whose matched part is replaced. Same `^` convention.
const PROPERTY_RENAMES: &[(&str, &str)] = &[
    ("color", "color1"),
    ("colorto", "color2"),
    ("piccolor", "foregroundColor"),
    ("disablecolor", "disabledColor"),
    ("justify", "alignment"),
    ("^borderwidth", "toolbar.borderWidth"),
    ("^bordercolor", "toolbar.borderColor"),
    ("^bevelwidth", "toolbar.marginWidth"),
    ("^handlewidth", "window.handleHeight"),
];

const APPEARANCE: &str = ".appearance";

/// Result of translating a legacy key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedKey {
    /// The rewritten, lower-cased key.
    pub key: String,
    /// The key was a plain `*.color`, rewritten to `*.color1` pending
    /// resolution against the item's appearance.
    pub ambiguous_color: bool,
}

/// Rewrite a legacy style key to the `*.appearance` naming.
///
/// The key is lower-cased, a trailing `:` is dropped and `hilite` becomes
/// `active`. The first matching item suffix, or failing that the first
/// matching property rename, is applied.
///
/// # Returns
///
/// `None` when nothing was rewritten.
#[must_use]
pub fn translate_legacy_key(key: &str) -> Option<TranslatedKey> {
    let key = key.strip_suffix(':').unwrap_or(key);
    if key.is_empty() {
        return None;
    }
    let mut key = key.to_ascii_lowercase();
    let hilite = match key.find("hilite") {
        Some(at) => {
            key.replace_range(at..at + "hilite".len(), "active");
            true
        }
        None => false,
    };

    for pattern in ITEM_SUFFIXES {
        if suffix_start(&key, pattern).is_some() {
            key.push_str(APPEARANCE);
            return Some(TranslatedKey {
                key,
                ambiguous_color: false,
            });
        }
    }

    for (index, (from, to)) in PROPERTY_RENAMES.iter().enumerate() {
        if let Some(start) = suffix_start(&key, from) {
            key.truncate(start);
            key.push_str(to);
            return Some(TranslatedKey {
                key,
                ambiguous_color: index == 0,
            });
        }
    }

    hilite.then_some(TranslatedKey {
        key,
        ambiguous_color: false,
    })
}

/// Byte offset where `pattern` matches at the end of `key`.
fn suffix_start(key: &str, pattern: &str) -> Option<usize> {
    match pattern.strip_prefix('^') {
        Some(whole) => (key == whole).then_some(0),
        None => {
            let start = key.len().checked_sub(pattern.len())?;
            let matches = start > 0
                && key.ends_with(pattern)
                && key.as_bytes()[start - 1] == b'.';
            matches.then_some(start)
        }
    }
}

/// Look up a legacy key in a style that uses the new naming.
///
/// An ambiguous `*.color` resolves to `*.color1` when the item's
/// `*.appearance` value mentions `gradient` or `interlaced`, and to
/// `*.backgroundColor` otherwise.
#[must_use]
pub fn lookup_legacy(store: &LineStore, key: &str) -> Option<crate::store::EntryId> {
    let translated = translate_legacy_key(key)?;
    let mut key = translated.key;

    if translated.ambiguous_color {
        let item = key.strip_suffix(".color1").unwrap_or(&key).to_string();
        let appearance = format!("{item}{APPEARANCE}");
        let textured = store.lookup(&appearance, true).is_some_and(|id| {
            let value = store.value(id).to_ascii_lowercase();
            value.contains("gradient") || value.contains("interlaced")
        });
        key = if textured {
            format!("{item}.color1")
        } else {
            format!("{item}.backgroundColor")
        };
    }

    log::trace!("legacy key translated to {}", key);
    store.lookup(&key, true)
}
