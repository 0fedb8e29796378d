//! Texture descriptions of style items.
//!
//! A style item such as `toolbar.appearance: raised gradient vertical bevel1`
//! is described by free-form words. [`StyleItem::parse`] picks out the known
//! words by case-insensitive substring search, so word order and unknown
//! words do not matter.
//!
//! # Example
//!
//! ```
//! use rcdb::api::{BevelPosition, BevelStyle, StyleItem, Texture};
//!
//! let item = StyleItem::parse("Sunken Gradient CrossDiagonal Bevel2");
//! assert_eq!(item.texture, Texture::CrossDiagonal);
//! assert_eq!(item.bevel_style, BevelStyle::Sunken);
//! assert_eq!(item.bevel_position, BevelPosition::Bevel2);
//! assert!(!item.interlaced);
//! ```

use serde::Serialize;

/// Fill pattern of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Texture {
    Solid,
    Horizontal,
    Vertical,
    CrossDiagonal,
    Diagonal,
    PipeCross,
    Elliptic,
    Rectangle,
    Pyramid,
}

/// Bevel look of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BevelStyle {
    Flat,
    Raised,
    Sunken,
}

/// Bevel offset of an item. Flat items have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BevelPosition {
    None,
    Bevel1,
    Bevel2,
    Bevel3,
}

// Searched in order; "crossdiagonal" must come before "diagonal"
const TEXTURES: &[(&str, Texture)] = &[
    ("solid", Texture::Solid),
    ("horizontal", Texture::Horizontal),
    ("vertical", Texture::Vertical),
    ("crossdiagonal", Texture::CrossDiagonal),
    ("diagonal", Texture::Diagonal),
    ("pipecross", Texture::PipeCross),
    ("elliptic", Texture::Elliptic),
    ("rectangle", Texture::Rectangle),
    ("pyramid", Texture::Pyramid),
];

const BEVEL_STYLES: &[(&str, BevelStyle)] = &[
    ("flat", BevelStyle::Flat),
    ("raised", BevelStyle::Raised),
    ("sunken", BevelStyle::Sunken),
];

const BEVEL_POSITIONS: &[(&str, BevelPosition)] = &[
    ("bevel1", BevelPosition::Bevel1),
    ("bevel2", BevelPosition::Bevel2),
    ("bevel3", BevelPosition::Bevel3),
];

/// Parsed texture description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleItem {
    /// Item is transparent to its parent; the other fields are neutral.
    pub parent_relative: bool,
    pub texture: Texture,
    pub bevel_style: BevelStyle,
    pub bevel_position: BevelPosition,
    pub interlaced: bool,
}

impl StyleItem {
    /// Parse a texture description.
    ///
    /// Missing words default to `solid`, `raised` and `bevel1`; `gradient`
    /// without a direction means diagonal.
    #[must_use]
    pub fn parse(description: &str) -> Self {
        let text = description.to_ascii_lowercase();

        if text.contains("parentrelative") {
            return Self {
                parent_relative: true,
                texture: Texture::Solid,
                bevel_style: BevelStyle::Flat,
                bevel_position: BevelPosition::None,
                interlaced: false,
            };
        }

        let texture = find_word(&text, TEXTURES).unwrap_or(if text.contains("gradient") {
            Texture::Diagonal
        } else {
            Texture::Solid
        });
        let bevel_style = find_word(&text, BEVEL_STYLES).unwrap_or(BevelStyle::Raised);
        let bevel_position = if bevel_style == BevelStyle::Flat {
            BevelPosition::None
        } else {
            find_word(&text, BEVEL_POSITIONS).unwrap_or(BevelPosition::Bevel1)
        };

        Self {
            parent_relative: false,
            texture,
            bevel_style,
            bevel_position,
            interlaced: text.contains("interlaced"),
        }
    }
}

fn find_word<T: Copy>(text: &str, table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(word, _)| text.contains(*word))
        .map(|(_, value)| *value)
}
