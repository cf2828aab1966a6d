//! Editor configuration: enabled capabilities and per-extension options.
//!
//! The capability list is fixed at construction. Commands for a disabled
//! capability are ignored and its markup is unwrapped when content is parsed.

use serde::{Deserialize, Serialize};

use crate::actions::EditorCommand;
use crate::model::MarkKind;
use crate::types::BlockType;

pub const DEFAULT_PLACEHOLDER: &str = "Start writing your program details...";
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Top-level editor configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub capabilities: Capabilities,
    pub image: ImageOptions,
    pub link: LinkOptions,
    pub video: VideoOptions,
    pub text_align: TextAlignOptions,
    pub highlight: HighlightOptions,
    /// Text shown while the document is empty.
    pub placeholder: String,
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            image: ImageOptions::default(),
            link: LinkOptions::default(),
            video: VideoOptions::default(),
            text_align: TextAlignOptions::default(),
            highlight: HighlightOptions::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// The formatting capabilities the editor supports. All enabled by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub code: bool,
    /// Headings, levels 1-3.
    pub headings: bool,
    pub bullet_list: bool,
    pub ordered_list: bool,
    pub blockquote: bool,
    pub text_align: bool,
    pub color: bool,
    pub highlight: bool,
    pub image: bool,
    pub link: bool,
    pub video: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl Capabilities {
    pub const fn all() -> Self {
        Self {
            bold: true,
            italic: true,
            underline: true,
            strike: true,
            code: true,
            headings: true,
            bullet_list: true,
            ordered_list: true,
            blockquote: true,
            text_align: true,
            color: true,
            highlight: true,
            image: true,
            link: true,
            video: true,
        }
    }

    /// Plain paragraphs and history only.
    pub const fn none() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            code: false,
            headings: false,
            bullet_list: false,
            ordered_list: false,
            blockquote: false,
            text_align: false,
            color: false,
            highlight: false,
            image: false,
            link: false,
            video: false,
        }
    }

    pub fn mark(&self, kind: MarkKind) -> bool {
        match kind {
            MarkKind::Bold => self.bold,
            MarkKind::Italic => self.italic,
            MarkKind::Underline => self.underline,
            MarkKind::Strike => self.strike,
            MarkKind::Code => self.code,
            MarkKind::Highlight => self.highlight,
        }
    }

    pub fn block(&self, block: BlockType) -> bool {
        match block {
            BlockType::Paragraph => true,
            BlockType::Heading(_) => self.headings,
            BlockType::BulletList => self.bullet_list,
            BlockType::OrderedList => self.ordered_list,
            BlockType::Blockquote => self.blockquote,
        }
    }

    /// Whether `command` is backed by an enabled capability.
    pub fn allows(&self, command: &EditorCommand) -> bool {
        use EditorCommand::*;
        match command {
            ToggleMark(kind) => self.mark(*kind),
            SetColor(_) | UnsetColor => self.color,
            ToggleHighlight | SetHighlight(_) => self.highlight,
            SetLink { .. } | UnsetLink | InsertLink { .. } => self.link,
            SetBlock(block) | ToggleBlock(block) => self.block(*block),
            SetAlignment(_) | UnsetAlignment => self.text_align,
            InsertImage { .. } => self.image,
            InsertVideo { .. } => self.video,
            InsertText(_)
            | InsertHardBreak
            | SplitBlock
            | DeleteBackward
            | DeleteForward
            | SetSelection(_)
            | SelectAll
            | Undo
            | Redo => true,
        }
    }
}

/// Image extension options. Images are always inline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Accept `data:` URLs as image sources.
    pub allow_base64: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self { allow_base64: true }
    }
}

impl ImageOptions {
    pub fn accepts(&self, src: &str) -> bool {
        self.allow_base64
            || !src
                .trim_start()
                .get(..5)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    }
}

/// Link behavior and the extra attributes written on every link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Follow links when clicked inside the editor.
    pub open_on_click: bool,
    pub target: Option<String>,
    pub rel: Option<String>,
    pub class: Option<String>,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            open_on_click: false,
            target: Some("_blank".to_string()),
            rel: Some("noopener noreferrer nofollow".to_string()),
            class: Some("text-blue-600 underline cursor-pointer".to_string()),
        }
    }
}

/// Embedded video player size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
        }
    }
}

/// Node types alignment applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignTarget {
    Heading,
    Paragraph,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAlignOptions {
    pub types: Vec<AlignTarget>,
}

impl Default for TextAlignOptions {
    fn default() -> Self {
        Self {
            types: vec![AlignTarget::Heading, AlignTarget::Paragraph],
        }
    }
}

impl TextAlignOptions {
    pub fn applies_to(&self, target: AlignTarget) -> bool {
        self.types.contains(&target)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
    /// Allow highlights with an explicit color.
    pub multicolor: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self { multicolor: true }
    }
}
