//! Typed accessors layered over string values.

use std::fmt;
use std::path::Path;

use super::{RcStore, StoreResult};

/// An RGB color as written in resource files (`#rrggbb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or `#rgb` (surrounding blanks allowed).
    ///
    /// # Example
    ///
    /// ```
    /// use rcdb::api::Rgb;
    ///
    /// assert_eq!(Rgb::parse("#ff8000"), Some(Rgb::new(255, 128, 0)));
    /// assert_eq!(Rgb::parse("#f80"), Some(Rgb::new(255, 136, 0)));
    /// assert_eq!(Rgb::parse("orange"), None);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (hex, short_ok) = match text.strip_prefix('#') {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self::new(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            3 if short_ok => {
                let expand = |n: u32| (n as u8 & 0xf) * 0x11;
                Some(Self::new(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Integer prefix of `text` the way C's `atoi` reads it: leading blanks,
/// an optional sign, then digits up to the first non-digit. Values outside
/// `i32` saturate.
#[must_use]
pub fn parse_int_prefix(text: &str) -> i32 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl RcStore {
    /// Read `true`/`false` (any case); anything else yields `default`.
    ///
    /// # Errors
    ///
    /// A cache error when the file exists but cannot be read.
    pub fn read_bool(&mut self, path: &Path, key: &str, default: bool) -> StoreResult<bool> {
        Ok(match self.read(path, key)? {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        })
    }

    /// Read an integer; an absent key yields `default`, a non-numeric value
    /// yields 0.
    ///
    /// # Errors
    ///
    /// A cache error when the file exists but cannot be read.
    pub fn read_int(&mut self, path: &Path, key: &str, default: i32) -> StoreResult<i32> {
        Ok(self.read(path, key)?.map_or(default, parse_int_prefix))
    }

    /// Read a string, or `default` when the key is absent.
    ///
    /// # Errors
    ///
    /// A cache error when the file exists but cannot be read.
    pub fn read_string(&mut self, path: &Path, key: &str, default: &str) -> StoreResult<String> {
        Ok(self.read(path, key)?.unwrap_or(default).to_string())
    }

    /// Read a color. When the key is empty or absent, `default` is parsed
    /// instead.
    ///
    /// # Returns
    ///
    /// `None` when the chosen text is not a color.
    ///
    /// # Errors
    ///
    /// A cache error when the file exists but cannot be read.
    pub fn read_color(&mut self, path: &Path, key: &str, default: &str) -> StoreResult<Option<Rgb>> {
        let value = if key.is_empty() {
            None
        } else {
            self.read(path, key)?
        };
        Ok(Rgb::parse(value.unwrap_or(default)))
    }

    /// Write `true` or `false`.
    ///
    /// # Errors
    ///
    /// See [`RcStore::write`].
    pub fn write_bool(&mut self, path: &Path, key: &str, value: bool) -> StoreResult<()> {
        self.write(path, key, Some(if value { "true" } else { "false" }))
    }

    /// Write a decimal integer.
    ///
    /// # Errors
    ///
    /// See [`RcStore::write`].
    pub fn write_int(&mut self, path: &Path, key: &str, value: i32) -> StoreResult<()> {
        self.write(path, key, Some(&value.to_string()))
    }

    /// Write a string.
    ///
    /// # Errors
    ///
    /// See [`RcStore::write`].
    pub fn write_string(&mut self, path: &Path, key: &str, value: &str) -> StoreResult<()> {
        self.write(path, key, Some(value))
    }

    /// Write a color as `#rrggbb`.
    ///
    /// # Errors
    ///
    /// See [`RcStore::write`].
    pub fn write_color(&mut self, path: &Path, key: &str, value: Rgb) -> StoreResult<()> {
        self.write(path, key, Some(&value.to_string()))
    }
}
