//! Text encoding of a resource file on disk.
//!
//! Files are decoded as UTF-8 when they are valid UTF-8. Anything else is
//! read one byte per character (ISO-8859-1), which maps every byte to a
//! character and back, so lines the store never touches are written back
//! byte for byte.

use serde::Serialize;

/// How a file's bytes map to text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Valid UTF-8.
    #[default]
    Utf8,
    /// One byte per character.
    Latin1,
}

impl TextEncoding {
    /// Decode file contents, picking the encoding that keeps every byte.
    #[must_use]
    pub fn decode(bytes: Vec<u8>) -> (String, Self) {
        match String::from_utf8(bytes) {
            Ok(text) => (text, Self::Utf8),
            Err(e) => {
                let text = e.into_bytes().into_iter().map(char::from).collect();
                (text, Self::Latin1)
            }
        }
    }

    /// Encode text for writing.
    ///
    /// # Errors
    ///
    /// Returns the first character the encoding cannot represent.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, char> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| c))
                .collect(),
        }
    }

    /// Whether every character of `text` can be written.
    #[must_use]
    pub fn can_encode(self, text: &str) -> bool {
        match self {
            Self::Utf8 => true,
            Self::Latin1 => text.chars().all(|c| u32::from(c) <= 0xFF),
        }
    }
}
