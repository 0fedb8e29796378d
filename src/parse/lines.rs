//! Line scanner for resource-file buffers.
//!
//! # Overview
//!
//! A resource file is read into memory as a whole and then cut into logical
//! lines by [`LineScanner`]. Each line is trimmed on both sides, horizontal
//! tabs become spaces, and the scanner stops once only whitespace remains.
//!
//! # Continuation
//!
//! When [`ScanOptions::continuation`] is set, a line whose last non-blank
//! character is a single backslash is joined with the following line. The
//! backslash and the blanks before it collapse into one space. A doubled
//! trailing backslash stands for one literal backslash and ends the line.
//!
//! # Example
//!
//! ```
//! use rcdb::parse::{LineScanner, ScanOptions};
//!
//! let text = "  menu.frame:\tbevel1  \n# comment\n";
//! let lines: Vec<String> = LineScanner::new(text, ScanOptions::default())
//!     .map(|l| l.text)
//!     .collect();
//! assert_eq!(lines, vec!["menu.frame: bevel1", "# comment"]);
//! ```

/// Options controlling how lines are scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Join lines ending in a single backslash with the next one.
    pub continuation: bool,
}

/// One trimmed logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// Trimmed, tab-normalized text of the line.
    pub text: String,
}

impl ScannedLine {
    /// First non-space character, `None` for a blank line.
    #[must_use]
    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    /// Whether the line is blank or starts with a comment marker.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self.first_char(), None | Some('#') | Some('!'))
    }
}

/// Iterator over the logical lines of a buffer.
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    buf: &'a [u8],
    pos: usize,
    options: ScanOptions,
}

impl<'a> LineScanner<'a> {
    /// Create a scanner positioned at the start of `text`.
    #[must_use]
    pub fn new(text: &'a str, options: ScanOptions) -> Self {
        Self {
            buf: text.as_bytes(),
            pos: 0,
            options,
        }
    }

    /// Byte offset of the next unread line.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn skip_leading_blanks(&mut self) {
        while self.pos < self.buf.len() {
            let b = self.buf[self.pos];
            if b == b'\n' || !is_blank(b) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Copy the rest of the current physical line into `out`, consuming
    /// the terminator. Returns the offset in `out` where the segment began.
    fn copy_segment(&mut self, out: &mut Vec<u8>) -> usize {
        let start = out.len();
        while self.pos < self.buf.len() {
            let b = self.buf[self.pos];
            self.pos += 1;
            if b == b'\n' {
                break;
            }
            out.push(if b == b'\t' { b' ' } else { b });
        }
        while out.len() > start && out.last().copied().is_some_and(is_blank) {
            out.pop();
        }
        start
    }
}

impl Iterator for LineScanner<'_> {
    type Item = ScannedLine;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_leading_blanks();
        if self.pos >= self.buf.len() {
            return None;
        }

        let mut out = Vec::new();
        loop {
            let start = self.copy_segment(&mut out);
            if !self.options.continuation {
                break;
            }
            let len = out.len();
            if len == start || out[len - 1] != b'\\' {
                break;
            }
            if len >= start + 2 && out[len - 2] == b'\\' {
                out.pop();
                break;
            }
            out.pop();
            while out.last().copied().is_some_and(is_blank) {
                out.pop();
            }
            out.push(b' ');
            self.skip_leading_blanks();
        }
        while out.last().copied().is_some_and(is_blank) {
            out.pop();
        }

        // Only ASCII bytes were removed or replaced, so the text is intact.
        let text = String::from_utf8_lossy(&out).into_owned();
        Some(ScannedLine { text })
    }
}

/// Control characters and space count as blanks.
#[must_use]
pub fn is_blank(b: u8) -> bool {
    b <= b' '
}
