//! Similarity heuristic for placing newly written keys.
//!
//! When a key is written that the file does not contain yet, it should land
//! next to its relatives rather than at the end of the file: writing
//! `toolbar.label.color` into a file holding `toolbar.label.font` puts the new
//! line right after the `toolbar.label.*` group.
//!
//! This heuristic only decides placement. Read lookups use
//! [`xrm_match`](super::xrm_match).

use super::xrm::scan_component;

/// Score how similar two folded keys are.
///
/// Counts the leading components both keys share. At the first differing
/// component a bonus point is given when the remaining texts agree on their
/// first four bytes, provided at least one component matched and both keys
/// have the same number of components. Each shared component counts two.
///
/// # Example
///
/// ```
/// use rcdb::matcher::similarity;
///
/// assert_eq!(similarity("toolbar.label.font", "toolbar.label.color"), 4);
/// assert_eq!(similarity("menu.frame.color", "toolbar.label.color"), 0);
/// // "window.label.focus" vs "window.label.focusColor": same prefix "focu"
/// assert_eq!(similarity("window.label.focus", "window.label.focuscolor"), 5);
/// ```
#[must_use]
pub fn similarity(a: &str, b: &str) -> u32 {
    let (mut a, mut b) = (a, b);
    let (mut count_a, mut count_b) = (0usize, 0usize);
    let mut matched = 0u32;
    let mut diverged = false;
    let mut prefix_bonus = false;

    loop {
        let (head_a, head_b) = (a, b);
        let (len_a, rest_a) = scan_component(a);
        let (len_b, rest_b) = scan_component(b);
        a = rest_a;
        b = rest_b;

        if len_a == 0 && len_b == 0 {
            break;
        }
        if len_a > 0 {
            count_a += 1;
        }
        if len_b > 0 {
            count_b += 1;
        }
        if len_a == 0 || len_b == 0 || diverged {
            continue;
        }

        if len_a == len_b && head_a.as_bytes()[..len_a] == head_b.as_bytes()[..len_b] {
            matched += 1;
            prefix_bonus = false;
        } else {
            diverged = true;
            prefix_bonus = prefix4(head_a) == prefix4(head_b);
        }
    }

    2 * matched + u32::from(prefix_bonus && matched > 0 && count_a == count_b)
}

/// First four bytes of `s`, zero-padded.
fn prefix4(s: &str) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (slot, b) in out.iter_mut().zip(s.bytes()) {
        *slot = b;
    }
    out
}

/// Choose the entry after which a new key should be inserted.
///
/// `keys` yields the folded key of every entry in file order, with an empty
/// string for comment lines (which are skipped but keep their position).
/// Only scores of at least 1 qualify. A run of consecutive entries sharing
/// the best score moves the insertion point to the end of the run; a later
/// run with the same score only wins when it is longer.
///
/// # Returns
///
/// The position of the entry to insert after, or `None` when nothing in the
/// file resembles `key`.
#[must_use]
pub fn best_insertion_point<'a, I>(keys: I, key: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best_score = 1;
    let mut run = 0usize;
    let mut best_run = 0usize;
    let mut position = None;

    for (index, existing) in keys.into_iter().enumerate() {
        if existing.is_empty() {
            continue;
        }
        let score = similarity(existing, key);
        if score != best_score {
            run = 0;
        }
        if score < best_score {
            continue;
        }
        run += 1;
        if score > best_score || run > best_run {
            best_score = score;
            best_run = run;
            position = Some(index);
        }
    }
    position
}
