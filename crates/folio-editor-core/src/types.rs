//! Core editor types: selection, heading levels, alignment and block kinds.
//!
//! These types are framework-agnostic and shared by the document model,
//! the command set and the toolbar.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A selection in flat document offsets (see [`crate::Document::resolve`]).
///
/// `anchor` stays put while `head` follows the cursor, so `head` may sit
/// before `anchor`.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A cursor at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Ordered range covered by the selection.
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Pull both ends back inside a document of size `max`.
    pub fn clamped(self, max: usize) -> Self {
        Self::new(self.anchor.min(max), self.head.min(max))
    }
}

/// Heading level. Only levels 1 through 3 are part of the schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const H1: HeadingLevel = HeadingLevel(1);
    pub const H2: HeadingLevel = HeadingLevel(2);
    pub const H3: HeadingLevel = HeadingLevel(3);

    /// All supported levels, in toolbar order.
    pub const ALL: [HeadingLevel; 3] = [Self::H1, Self::H2, Self::H3];

    /// Returns `None` for levels outside 1..=3.
    pub fn new(level: u8) -> Option<Self> {
        (1..=3).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HeadingLevel::new(level).ok_or_else(|| format!("unsupported heading level {level}"))
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// Horizontal alignment of a paragraph or heading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub const ALL: [TextAlign; 4] = [Self::Left, Self::Center, Self::Right, Self::Justify];

    /// CSS keyword for the `text-align` property.
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Structural block types addressed by `set-block` / `toggle-block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    Paragraph,
    Heading(HeadingLevel),
    BulletList,
    OrderedList,
    Blockquote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_selection_orders_range() {
        let drag_left = Selection::new(12, 3);
        assert_eq!(drag_left.to_range(), 3..12);
        assert_eq!(drag_left.to_range(), Selection::new(3, 12).to_range());
        assert!(!drag_left.is_collapsed());
        assert!(Selection::collapsed(4).is_collapsed());
    }

    #[test]
    fn test_clamp_keeps_direction() {
        assert_eq!(Selection::new(40, 2).clamped(10), Selection::new(10, 2));
    }

    #[test]
    fn test_heading_level_range() {
        assert!(HeadingLevel::new(0).is_none());
        assert_eq!(HeadingLevel::new(2), Some(HeadingLevel::H2));
        assert!(HeadingLevel::new(4).is_none());
    }

    #[test]
    fn test_text_align_css() {
        assert_eq!(TextAlign::from_css(" Center "), Some(TextAlign::Center));
        assert_eq!(TextAlign::from_css("start"), Some(TextAlign::Left));
        assert_eq!(TextAlign::from_css("middle"), None);
        assert_eq!(TextAlign::Justify.to_string(), "justify");
    }
}
