//! Editor commands.
//!
//! Platform-agnostic definitions for everything the editor can be asked to
//! do. Formatting and insertion commands come from the toolbar; typing
//! commands come from whatever input layer the host has.

use smol_str::SmolStr;

use crate::model::MarkKind;
use crate::types::{BlockType, Selection, TextAlign};

/// All editor operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    // === Marks ===
    /// Toggle a mark on the selection, or arm it for typing at a cursor.
    ToggleMark(MarkKind),
    /// Set the text color (CSS color value).
    SetColor(SmolStr),
    UnsetColor,
    ToggleHighlight,
    /// Highlight with an explicit background color.
    SetHighlight(SmolStr),
    /// Link the selected text.
    SetLink { href: SmolStr },
    /// Remove the link at the cursor or from the selection.
    UnsetLink,

    // === Blocks ===
    /// Convert the selected blocks unconditionally.
    SetBlock(BlockType),
    /// Convert the selected blocks, or revert them if already converted.
    ToggleBlock(BlockType),
    SetAlignment(TextAlign),
    UnsetAlignment,

    // === Insertion ===
    InsertImage { src: SmolStr },
    /// Insert linked text, or link the selection when `text` is empty.
    InsertLink {
        href: SmolStr,
        text: Option<String>,
    },
    InsertVideo { src: SmolStr },

    // === Typing ===
    InsertText(String),
    /// Line break inside the current block (Shift+Enter).
    InsertHardBreak,
    /// Split the current block (Enter).
    SplitBlock,
    DeleteBackward,
    DeleteForward,

    // === Selection ===
    SetSelection(Selection),
    SelectAll,

    // === History ===
    Undo,
    Redo,
}

impl EditorCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::ToggleMark(_) => "toggle-mark",
            EditorCommand::SetColor(_) => "set-color",
            EditorCommand::UnsetColor => "unset-color",
            EditorCommand::ToggleHighlight => "toggle-highlight",
            EditorCommand::SetHighlight(_) => "set-highlight",
            EditorCommand::SetLink { .. } => "set-link",
            EditorCommand::UnsetLink => "unset-link",
            EditorCommand::SetBlock(_) => "set-block",
            EditorCommand::ToggleBlock(_) => "toggle-block",
            EditorCommand::SetAlignment(_) => "set-alignment",
            EditorCommand::UnsetAlignment => "unset-alignment",
            EditorCommand::InsertImage { .. } => "insert-image",
            EditorCommand::InsertLink { .. } => "insert-link",
            EditorCommand::InsertVideo { .. } => "insert-video",
            EditorCommand::InsertText(_) => "insert-text",
            EditorCommand::InsertHardBreak => "insert-hard-break",
            EditorCommand::SplitBlock => "split-block",
            EditorCommand::DeleteBackward => "delete-backward",
            EditorCommand::DeleteForward => "delete-forward",
            EditorCommand::SetSelection(_) => "set-selection",
            EditorCommand::SelectAll => "select-all",
            EditorCommand::Undo => "undo",
            EditorCommand::Redo => "redo",
        }
    }

    /// Undo and redo act on the history rather than the document.
    pub fn is_history(&self) -> bool {
        matches!(self, EditorCommand::Undo | EditorCommand::Redo)
    }
}
