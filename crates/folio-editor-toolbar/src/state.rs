//! Formatting state read off the editor for the toolbar.

use folio_editor_core::{
    BlockType, ChangeSink, Editor, EditorDocument, HeadingLevel, MarkKind, SmolStr, TextAlign,
};
use serde::Serialize;

/// Snapshot of what is active at the selection.
///
/// Captured fresh on every query; holding on to one across edits gives
/// stale answers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub code: bool,
    pub highlight: bool,
    /// Active heading level, if every selected block is that heading.
    pub heading: Option<HeadingLevel>,
    pub bullet_list: bool,
    pub ordered_list: bool,
    pub blockquote: bool,
    pub alignment: Option<TextAlign>,
    pub color: Option<SmolStr>,
    pub link: Option<SmolStr>,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl ToolbarState {
    /// Read the state of a mounted editor. `None` before mount.
    pub fn capture<S: ChangeSink>(editor: &Editor<S>) -> Option<Self> {
        let doc = editor.state()?;
        Some(Self {
            bold: doc.is_mark_active(MarkKind::Bold),
            italic: doc.is_mark_active(MarkKind::Italic),
            underline: doc.is_mark_active(MarkKind::Underline),
            strike: doc.is_mark_active(MarkKind::Strike),
            code: doc.is_mark_active(MarkKind::Code),
            highlight: doc.is_mark_active(MarkKind::Highlight),
            heading: HeadingLevel::ALL
                .into_iter()
                .find(|level| doc.is_block_active(BlockType::Heading(*level))),
            bullet_list: doc.is_block_active(BlockType::BulletList),
            ordered_list: doc.is_block_active(BlockType::OrderedList),
            blockquote: doc.is_block_active(BlockType::Blockquote),
            alignment: doc.active_alignment(),
            color: doc.active_color(),
            link: doc.active_link(),
            can_undo: editor.can_undo(),
            can_redo: editor.can_redo(),
        })
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
}
