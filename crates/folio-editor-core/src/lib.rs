//! folio-editor-core: framework-agnostic rich-text editing.
//!
//! This crate provides:
//! - `Document` - block/inline document model with flat positions
//! - `parse_html` / `to_html` - the HTML codec for stored content
//! - `EditorDocument` trait and `execute_command` - formatting and typing commands
//! - `Editor` - lifecycle, undo history and change notification
//! - `ContentBridge` - sync with an externally owned content string

pub mod actions;
pub mod bridge;
pub mod config;
pub mod document;
pub mod editor;
pub mod embed;
pub mod error;
pub mod execute;
pub mod html;
pub mod model;
pub mod types;
pub mod undo;

pub use actions::EditorCommand;
pub use bridge::{ContentBridge, SyncOutcome};
pub use config::{
    AlignTarget, Capabilities, EditorConfig, HighlightOptions, ImageOptions, LinkOptions,
    TextAlignOptions, VideoOptions,
};
pub use document::{EditorDocument, PlainEditor};
pub use editor::{ChangeSink, DocumentChanged, Editor, EditorStatus};
pub use error::{ParseError, ParseErrorKind};
pub use execute::execute_command;
pub use html::{parse_html, to_html, write_html};
pub use model::{
    Block, Container, Document, ImageNode, Inline, Mark, MarkKind, MarkSet, ResolvedPos,
    TextBlock, TextKind, TextRun, VideoEmbed,
};
pub use smol_str::SmolStr;
pub use types::{BlockType, HeadingLevel, Selection, TextAlign};
pub use undo::{Snapshot, UndoHistory, UndoManager};
