//! XRM-style wildcard matching over dotted keys.
//!
//! # Overview
//!
//! Keys are sequences of components separated by dots. A pattern component
//! is either a literal, `?` (exactly one arbitrary component) or `*` (zero
//! or more components). `toolbar*color` is the same pattern as
//! `toolbar.*.color`; both match `toolbar.color`, `toolbar.label.color` and
//! `toolbar.button.pressed.color`.
//!
//! # Scoring
//!
//! [`xrm_match`] does not just answer yes or no. Each consumed key component
//! halves a weight that starts at 256, literal components add the current
//! weight, and a `*` contributes the score of the remaining match scaled by
//! `weight / 384`. Earlier components therefore count for more, and explicit
//! paths beat paths bridged by `*`. A return value of 0 means no match; any
//! match, even one made only of `?` and `*`, scores at least 1.
//!
//! # Trailing `*`
//!
//! A `*` at the end of a pattern may match zero components, so `menu.*`
//! matches the bare key `menu` as well as `menu.frame`. Delete-by-pattern
//! uses the same rule: deleting `menu.*` also removes a `menu` line.
//!
//! # Example
//!
//! ```
//! use rcdb::matcher::xrm_match;
//!
//! assert!(xrm_match("toolbar.label.color", "toolbar*color") > 0);
//! assert!(xrm_match("toolbar.label.color", "toolbar.?.color") > 0);
//! assert_eq!(xrm_match("menu.frame.color", "toolbar.*"), 0);
//!
//! // The more explicit pattern scores higher
//! let explicit = xrm_match("toolbar.label.color", "toolbar.label.*");
//! let loose = xrm_match("toolbar.label.color", "*.color");
//! assert!(explicit > loose);
//! ```

/// Initial weight of the first key component.
const START_WEIGHT: u32 = 256;

/// Divisor applied to scores obtained through a `*`.
const STAR_DISCOUNT: u32 = 384;

/// Scan one component off the front of `input`.
///
/// A component starting with `*` or `?` consumes the marker together with
/// any directly following `*`, `?` or `.` characters and has length 1. A
/// literal component runs up to the next dot or wildcard marker; repeated
/// dots after it are skipped.
///
/// # Returns
///
/// The component length and the remaining input. A length of 0 means the
/// input is exhausted (or starts with a dot).
#[must_use]
pub fn scan_component(input: &str) -> (usize, &str) {
    let b = input.as_bytes();
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'*' | b'?' => {
                if i > 0 {
                    return (i, &input[i..]);
                }
                i += 1;
                while i < b.len() && matches!(b[i], b'.' | b'*' | b'?') {
                    i += 1;
                }
                return (1, &input[i..]);
            }
            b'.' => {
                let len = i;
                while i < b.len() && b[i] == b'.' {
                    i += 1;
                }
                return (len, &input[i..]);
            }
            _ => i += 1,
        }
    }
    (i, &input[i..])
}

/// Whether a key contains a wildcard marker.
#[must_use]
pub fn is_wildcard(key: &str) -> bool {
    key.bytes().any(|b| b == b'*' || b == b'?')
}

/// Number of components in a key.
#[must_use]
pub fn component_count(key: &str) -> usize {
    let mut rest = key;
    let mut count = 0;
    loop {
        let (len, next) = scan_component(rest);
        if len == 0 {
            return count;
        }
        count += 1;
        rest = next;
    }
}

/// Match a folded `key` against a folded `pattern`.
///
/// # Returns
///
/// 0 when the pattern does not match, otherwise a positive score that grows
/// with the specificity of the match. `xrm_match("menu", "menu.*")` is a
/// match.
#[must_use]
pub fn xrm_match(key: &str, pattern: &str) -> u32 {
    if key.is_empty() || pattern.is_empty() {
        return 0;
    }
    // A match made only of `?`/`*` components scores 0 internally, so the
    // public score is shifted by one to keep 0 meaning "no match".
    match_from(key, pattern).map_or(0, |score| score + 1)
}

fn match_from(mut key: &str, mut pattern: &str) -> Option<u32> {
    let mut weight = START_WEIGHT;
    let mut score = 0;
    loop {
        let (k, key_rest) = scan_component(key);
        let (p, pattern_rest) = scan_component(pattern);
        let star = p > 0 && pattern.as_bytes()[0] == b'*';

        if k == 0 {
            // A trailing `*` also matches zero components
            return (p == 0 || (star && pattern_rest.is_empty())).then_some(score);
        }
        if p == 0 {
            return None;
        }

        if star {
            if pattern_rest.is_empty() {
                return Some(score);
            }
            if let Some(inner) = match_from(key, pattern_rest) {
                return Some(score + inner * weight / STAR_DISCOUNT);
            }
            // Let the `*` swallow this key component and retry
            key = key_rest;
            weight /= 2;
            continue;
        }

        if pattern.as_bytes()[0] != b'?' {
            if k != p || key.as_bytes()[..k] != pattern.as_bytes()[..p] {
                return None;
            }
            score += weight;
        }
        pattern = pattern_rest;
        key = key_rest;
        weight /= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_component_literal() {
        assert_eq!(scan_component("toolbar.label"), (7, "label"));
        assert_eq!(scan_component("label"), (5, ""));
        assert_eq!(scan_component("a..b"), (1, "b"));
        assert_eq!(scan_component(""), (0, ""));
    }

    #[test]
    fn test_scan_component_wildcards_collapse() {
        assert_eq!(scan_component("*.color"), (1, "color"));
        assert_eq!(scan_component("*?*.x"), (1, "x"));
        assert_eq!(scan_component("?.y"), (1, "y"));
        // A literal stops at a wildcard marker
        assert_eq!(scan_component("toolbar*color"), (7, "*color"));
    }

    #[test]
    fn test_component_count() {
        assert_eq!(component_count("a.b.c"), 3);
        assert_eq!(component_count("toolbar*color"), 3);
        assert_eq!(component_count(""), 0);
    }

    #[test]
    fn test_literal_match() {
        assert_eq!(xrm_match("menu.frame", "menu.frame"), 256 + 128 + 1);
        assert_eq!(xrm_match("menu.frame", "menu.title"), 0);
        assert_eq!(xrm_match("menu", "menu.frame"), 0);
        assert_eq!(xrm_match("menu.frame", "menu"), 0);
    }

    #[test]
    fn test_question_mark_matches_one_component() {
        assert!(xrm_match("toolbar.label.color", "toolbar.?.color") > 0);
        assert_eq!(xrm_match("toolbar.color", "toolbar.?.color"), 0);
        assert_eq!(xrm_match("toolbar.a.b.color", "toolbar.?.color"), 0);
        assert!(xrm_match("x", "?") > 0);
    }

    #[test]
    fn test_star_matches_zero_or_more() {
        assert!(xrm_match("toolbar.color", "toolbar*color") > 0);
        assert!(xrm_match("toolbar.label.color", "toolbar*color") > 0);
        assert!(xrm_match("toolbar.button.pressed.color", "toolbar*color") > 0);
        assert_eq!(xrm_match("menu.color", "toolbar*color"), 0);
    }

    #[test]
    fn test_trailing_star() {
        assert!(xrm_match("menu.frame", "menu.*") > 0);
        assert!(xrm_match("menu", "menu.*") > 0);
        assert!(xrm_match("anything.at.all", "*") > 0);
    }

    #[test]
    fn test_star_forms_are_equivalent() {
        for key in ["toolbar.color", "toolbar.label.color", "toolbar.x.y.color"] {
            assert_eq!(
                xrm_match(key, "toolbar*color"),
                xrm_match(key, "toolbar.*.color")
            );
        }
    }

    #[test]
    fn test_scores_favor_specific_patterns() {
        let key = "toolbar.button.color";
        let explicit = xrm_match(key, "toolbar.button.*");
        let star = xrm_match(key, "toolbar.*.color");
        let loose = xrm_match(key, "*.color");
        assert!(explicit > star, "{explicit} vs {star}");
        assert!(star > loose, "{star} vs {loose}");
        assert!(loose > 0);
    }

    #[test]
    fn test_direct_star_beats_deep_star() {
        let shallow = xrm_match("toolbar.color", "toolbar*color");
        let deep = xrm_match("toolbar.label.color", "toolbar*color");
        assert!(shallow > deep);
    }

    #[test]
    fn test_empty_inputs_never_match() {
        assert_eq!(xrm_match("", "*"), 0);
        assert_eq!(xrm_match("a", ""), 0);
    }

    #[test]
    fn test_is_wildcard() {
        assert!(is_wildcard("menu.*"));
        assert!(is_wildcard("menu.?.color"));
        assert!(!is_wildcard("menu.frame"));
    }
}
