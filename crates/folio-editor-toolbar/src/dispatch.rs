//! Toolbar controls and the commands they dispatch.

use folio_editor_core::{
    BlockType, Capabilities, ChangeSink, Editor, EditorCommand, HeadingLevel, MarkKind, TextAlign,
};
use serde::Serialize;
use smol_str::SmolStr;

use crate::popover::{ColorInput, ImageInput, LinkInput, Popover, VideoInput};
use crate::state::ToolbarState;

/// Visual grouping of controls; groups are separated in the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ToolbarGroup {
    Marks,
    Headings,
    Blocks,
    Alignment,
    Color,
    Media,
    History,
}

/// Which popover a control opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PopoverKind {
    Color,
    Image,
    Link,
    Video,
}

/// A toolbar button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ToolbarAction {
    Mark(MarkKind),
    Heading(HeadingLevel),
    BulletList,
    OrderedList,
    Blockquote,
    Align(TextAlign),
    TextColor,
    Image,
    Link,
    Video,
    Undo,
    Redo,
}

impl ToolbarAction {
    /// Every action, in toolbar order.
    pub const ALL: [ToolbarAction; 20] = [
        ToolbarAction::Mark(MarkKind::Bold),
        ToolbarAction::Mark(MarkKind::Italic),
        ToolbarAction::Mark(MarkKind::Underline),
        ToolbarAction::Mark(MarkKind::Strike),
        ToolbarAction::Mark(MarkKind::Code),
        ToolbarAction::Heading(HeadingLevel::H1),
        ToolbarAction::Heading(HeadingLevel::H2),
        ToolbarAction::Heading(HeadingLevel::H3),
        ToolbarAction::BulletList,
        ToolbarAction::OrderedList,
        ToolbarAction::Blockquote,
        ToolbarAction::Align(TextAlign::Left),
        ToolbarAction::Align(TextAlign::Center),
        ToolbarAction::Align(TextAlign::Right),
        ToolbarAction::Align(TextAlign::Justify),
        ToolbarAction::TextColor,
        ToolbarAction::Mark(MarkKind::Highlight),
        ToolbarAction::Image,
        ToolbarAction::Link,
        ToolbarAction::Video,
    ];

    /// Undo and redo close the toolbar.
    pub const HISTORY: [ToolbarAction; 2] = [ToolbarAction::Undo, ToolbarAction::Redo];

    pub fn title(self) -> &'static str {
        match self {
            ToolbarAction::Mark(MarkKind::Bold) => "Bold",
            ToolbarAction::Mark(MarkKind::Italic) => "Italic",
            ToolbarAction::Mark(MarkKind::Underline) => "Underline",
            ToolbarAction::Mark(MarkKind::Strike) => "Strikethrough",
            ToolbarAction::Mark(MarkKind::Code) => "Code",
            ToolbarAction::Mark(MarkKind::Highlight) => "Highlight",
            ToolbarAction::Heading(level) => match level.get() {
                1 => "Heading 1",
                2 => "Heading 2",
                _ => "Heading 3",
            },
            ToolbarAction::BulletList => "Bullet List",
            ToolbarAction::OrderedList => "Numbered List",
            ToolbarAction::Blockquote => "Quote",
            ToolbarAction::Align(TextAlign::Left) => "Align Left",
            ToolbarAction::Align(TextAlign::Center) => "Align Center",
            ToolbarAction::Align(TextAlign::Right) => "Align Right",
            ToolbarAction::Align(TextAlign::Justify) => "Justify",
            ToolbarAction::TextColor => "Text Color",
            ToolbarAction::Image => "Insert Image",
            ToolbarAction::Link => "Insert Link",
            ToolbarAction::Video => "Insert YouTube Video",
            ToolbarAction::Undo => "Undo",
            ToolbarAction::Redo => "Redo",
        }
    }

    pub fn group(self) -> ToolbarGroup {
        match self {
            ToolbarAction::Mark(MarkKind::Highlight) | ToolbarAction::TextColor => {
                ToolbarGroup::Color
            }
            ToolbarAction::Mark(_) => ToolbarGroup::Marks,
            ToolbarAction::Heading(_) => ToolbarGroup::Headings,
            ToolbarAction::BulletList | ToolbarAction::OrderedList | ToolbarAction::Blockquote => {
                ToolbarGroup::Blocks
            }
            ToolbarAction::Align(_) => ToolbarGroup::Alignment,
            ToolbarAction::Image | ToolbarAction::Link | ToolbarAction::Video => {
                ToolbarGroup::Media
            }
            ToolbarAction::Undo | ToolbarAction::Redo => ToolbarGroup::History,
        }
    }

    /// The command a press runs directly, or `None` for popover buttons.
    pub fn command(self) -> Option<EditorCommand> {
        let command = match self {
            ToolbarAction::Mark(MarkKind::Highlight) => EditorCommand::ToggleHighlight,
            ToolbarAction::Mark(kind) => EditorCommand::ToggleMark(kind),
            ToolbarAction::Heading(level) => EditorCommand::ToggleBlock(BlockType::Heading(level)),
            ToolbarAction::BulletList => EditorCommand::ToggleBlock(BlockType::BulletList),
            ToolbarAction::OrderedList => EditorCommand::ToggleBlock(BlockType::OrderedList),
            ToolbarAction::Blockquote => EditorCommand::ToggleBlock(BlockType::Blockquote),
            ToolbarAction::Align(align) => EditorCommand::SetAlignment(align),
            ToolbarAction::Undo => EditorCommand::Undo,
            ToolbarAction::Redo => EditorCommand::Redo,
            ToolbarAction::TextColor
            | ToolbarAction::Image
            | ToolbarAction::Link
            | ToolbarAction::Video => return None,
        };
        Some(command)
    }

    pub fn popover(self) -> Option<PopoverKind> {
        match self {
            ToolbarAction::TextColor => Some(PopoverKind::Color),
            ToolbarAction::Image => Some(PopoverKind::Image),
            ToolbarAction::Link => Some(PopoverKind::Link),
            ToolbarAction::Video => Some(PopoverKind::Video),
            _ => None,
        }
    }

    /// Whether the configured capabilities include this control.
    pub fn is_supported(self, capabilities: &Capabilities) -> bool {
        match self {
            ToolbarAction::Mark(kind) => capabilities.mark(kind),
            ToolbarAction::Heading(_) => capabilities.headings,
            ToolbarAction::BulletList => capabilities.bullet_list,
            ToolbarAction::OrderedList => capabilities.ordered_list,
            ToolbarAction::Blockquote => capabilities.blockquote,
            ToolbarAction::Align(_) => capabilities.text_align,
            ToolbarAction::TextColor => capabilities.color,
            ToolbarAction::Image => capabilities.image,
            ToolbarAction::Link => capabilities.link,
            ToolbarAction::Video => capabilities.video,
            ToolbarAction::Undo | ToolbarAction::Redo => true,
        }
    }

    /// Pressed state for this control.
    pub fn is_active(self, state: &ToolbarState) -> bool {
        match self {
            ToolbarAction::Mark(kind) => state.mark(kind),
            ToolbarAction::Heading(level) => state.heading == Some(level),
            ToolbarAction::BulletList => state.bullet_list,
            ToolbarAction::OrderedList => state.ordered_list,
            ToolbarAction::Blockquote => state.blockquote,
            ToolbarAction::Align(align) => state.alignment == Some(align),
            ToolbarAction::TextColor
            | ToolbarAction::Image
            | ToolbarAction::Link
            | ToolbarAction::Video
            | ToolbarAction::Undo
            | ToolbarAction::Redo => false,
        }
    }
}

/// Everything a host needs to draw one button.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Control {
    pub action: ToolbarAction,
    pub title: &'static str,
    pub group: ToolbarGroup,
    pub active: bool,
    pub disabled: bool,
    /// The control's popover is open.
    pub expanded: bool,
}

/// Toolbar with its popovers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Toolbar {
    pub color: Popover<ColorInput>,
    pub image: Popover<ImageInput>,
    pub link: Popover<LinkInput>,
    pub video: Popover<VideoInput>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, kind: PopoverKind) -> bool {
        match kind {
            PopoverKind::Color => self.color.is_open(),
            PopoverKind::Image => self.image.is_open(),
            PopoverKind::Link => self.link.is_open(),
            PopoverKind::Video => self.video.is_open(),
        }
    }

    /// Controls for the editor's current state.
    ///
    /// Empty until the editor is mounted. Controls for disabled capabilities
    /// are left out.
    pub fn controls<S: ChangeSink>(&self, editor: &Editor<S>) -> Vec<Control> {
        let Some(state) = ToolbarState::capture(editor) else {
            return Vec::new();
        };
        let capabilities = &editor.config().capabilities;
        ToolbarAction::ALL
            .into_iter()
            .chain(ToolbarAction::HISTORY)
            .filter(|action| action.is_supported(capabilities))
            .map(|action| Control {
                action,
                title: action.title(),
                group: action.group(),
                active: action.is_active(&state),
                disabled: match action {
                    ToolbarAction::Undo => !state.can_undo,
                    ToolbarAction::Redo => !state.can_redo,
                    _ => false,
                },
                expanded: action.popover().is_some_and(|kind| self.is_open(kind)),
            })
            .collect()
    }

    /// Press a control: run its command, or toggle its popover.
    pub fn press<S: ChangeSink>(&mut self, editor: &mut Editor<S>, action: ToolbarAction) -> bool {
        match action.popover() {
            Some(PopoverKind::Color) => self.color.toggle(),
            Some(PopoverKind::Image) => self.image.toggle(),
            Some(PopoverKind::Link) => self.link.toggle(),
            Some(PopoverKind::Video) => self.video.toggle(),
            None => {
                let Some(command) = action.command() else {
                    return false;
                };
                return editor.execute(&command);
            }
        }
        true
    }

    /// Close a popover without touching the document.
    pub fn dismiss(&mut self, kind: PopoverKind) {
        match kind {
            PopoverKind::Color => self.color.dismiss(),
            PopoverKind::Image => self.image.dismiss(),
            PopoverKind::Link => self.link.dismiss(),
            PopoverKind::Video => self.video.dismiss(),
        }
    }

    /// Choose a swatch. Nothing is applied until [`Toolbar::apply_color`].
    pub fn pick_color(&mut self, color: impl Into<SmolStr>) {
        self.color.input_mut().color = color.into();
    }

    pub fn apply_color<S: ChangeSink>(&mut self, editor: &mut Editor<S>) -> bool {
        if !editor.is_ready() {
            return false;
        }
        let Some(input) = self.color.take() else {
            return false;
        };
        editor.execute(&EditorCommand::SetColor(input.color))
    }

    pub fn confirm_image<S: ChangeSink>(&mut self, editor: &mut Editor<S>) -> bool {
        if !editor.is_ready() {
            return false;
        }
        let Some(input) = self.image.take() else {
            tracing::debug!("image url missing");
            return false;
        };
        editor.execute(&EditorCommand::InsertImage {
            src: input.url.into(),
        })
    }

    /// Insert linked text, or link the selection when no text was given.
    pub fn confirm_link<S: ChangeSink>(&mut self, editor: &mut Editor<S>) -> bool {
        if !editor.is_ready() {
            return false;
        }
        let Some(input) = self.link.take() else {
            tracing::debug!("link url missing");
            return false;
        };
        editor.execute(&EditorCommand::InsertLink {
            href: input.url.into(),
            text: Some(input.text).filter(|text| !text.is_empty()),
        })
    }

    pub fn confirm_video<S: ChangeSink>(&mut self, editor: &mut Editor<S>) -> bool {
        if !editor.is_ready() {
            return false;
        }
        let Some(input) = self.video.take() else {
            tracing::debug!("video url missing");
            return false;
        };
        editor.execute(&EditorCommand::InsertVideo {
            src: input.url.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_follow_toolbar_order() {
        let titles: Vec<_> = ToolbarAction::ALL
            .into_iter()
            .chain(ToolbarAction::HISTORY)
            .map(ToolbarAction::title)
            .collect();
        assert_eq!(
            titles,
            [
                "Bold",
                "Italic",
                "Underline",
                "Strikethrough",
                "Code",
                "Heading 1",
                "Heading 2",
                "Heading 3",
                "Bullet List",
                "Numbered List",
                "Quote",
                "Align Left",
                "Align Center",
                "Align Right",
                "Justify",
                "Text Color",
                "Highlight",
                "Insert Image",
                "Insert Link",
                "Insert YouTube Video",
                "Undo",
                "Redo",
            ]
        );
    }

    #[test]
    fn test_popover_buttons_have_no_direct_command() {
        for action in ToolbarAction::ALL {
            assert_ne!(action.command().is_some(), action.popover().is_some(), "{action:?}");
        }
    }
}
