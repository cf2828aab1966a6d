//! The mounted editor.
//!
//! [`Editor`] owns the live document for as long as it is mounted. It gates
//! commands on readiness and capabilities, records undo steps, and reports
//! every document mutation to its [`ChangeSink`] exactly once.

use smol_str::SmolStr;

use crate::actions::EditorCommand;
use crate::config::EditorConfig;
use crate::document::{EditorDocument, PlainEditor};
use crate::execute::execute_command;
use crate::html::{parse_html, to_html};
use crate::model::Document;
use crate::undo::{Snapshot, UndoHistory, UndoManager};

/// Emitted after every mutation of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentChanged {
    /// The document serialized right after the mutation.
    pub html: String,
}

/// Receiver for editor notifications.
pub trait ChangeSink {
    fn document_changed(&mut self, event: DocumentChanged);

    /// Content was loaded from outside the editor (mount or [`Editor::set_content`]).
    ///
    /// `content` is the source string as given, not its serialization.
    fn content_replaced(&mut self, _content: &str) {}
}

impl ChangeSink for () {
    fn document_changed(&mut self, _event: DocumentChanged) {}
}

impl ChangeSink for Vec<DocumentChanged> {
    fn document_changed(&mut self, event: DocumentChanged) {
        self.push(event);
    }
}

/// Where the editor is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorStatus {
    /// Constructed but not mounted yet.
    #[default]
    Pending,
    Ready,
    Destroyed,
}

/// State that only exists while mounted.
#[derive(Debug)]
struct Instance {
    state: PlainEditor,
    history: UndoHistory<Snapshot>,
    focused: bool,
    /// Serialization of `state`'s document, refreshed on every change.
    html: String,
}

/// A rich-text editor bound to a change sink.
#[derive(Debug)]
pub struct Editor<S = ()> {
    config: EditorConfig,
    /// Content to load at mount.
    initial: String,
    instance: Option<Instance>,
    status: EditorStatus,
    sink: S,
}

/// Parse `content`, falling back to an empty document.
fn parse_or_empty(content: &str, config: &EditorConfig) -> Document {
    match parse_html(content, config) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(
                error = %err,
                offset = err.offset(),
                "content could not be parsed, starting from an empty document"
            );
            Document::empty()
        }
    }
}

impl<S: ChangeSink> Editor<S> {
    /// Create an editor that will load `content` when mounted.
    pub fn new(config: EditorConfig, content: impl Into<String>, sink: S) -> Self {
        Self {
            config,
            initial: content.into(),
            instance: None,
            status: EditorStatus::Pending,
            sink,
        }
    }

    /// Build the live document from the initial content.
    ///
    /// Only the first call has an effect; a destroyed editor stays destroyed.
    pub fn mount(&mut self) {
        if self.status != EditorStatus::Pending {
            tracing::debug!(status = ?self.status, "mount ignored");
            return;
        }
        let content = std::mem::take(&mut self.initial);
        let document = parse_or_empty(&content, &self.config);
        let html = to_html(&document, &self.config);
        self.instance = Some(Instance {
            state: PlainEditor::new(document),
            history: UndoHistory::new(self.config.history_depth),
            focused: false,
            html,
        });
        self.status = EditorStatus::Ready;
        self.sink.content_replaced(&content);
    }

    /// Drop the live document. Every later command is a no-op.
    pub fn destroy(&mut self) {
        self.instance = None;
        self.status = EditorStatus::Destroyed;
    }

    pub fn status(&self) -> EditorStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.instance.is_some()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current serialized content, if mounted.
    pub fn html(&self) -> Option<&str> {
        self.instance.as_ref().map(|instance| instance.html.as_str())
    }

    pub fn document(&self) -> Option<&Document> {
        self.state().map(EditorDocument::document)
    }

    /// Document, selection and stored marks, for formatting queries.
    pub fn state(&self) -> Option<&PlainEditor> {
        self.instance.as_ref().map(|instance| &instance.state)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Run a command. Returns true if it was handled.
    ///
    /// Handled commands take focus. A command that changes the document
    /// records one undo step and fires one [`DocumentChanged`].
    pub fn execute(&mut self, command: &EditorCommand) -> bool {
        let Some(instance) = self.instance.as_mut() else {
            tracing::debug!(
                command = command.name(),
                status = ?self.status,
                "editor not ready, command ignored"
            );
            return false;
        };
        if !self.config.capabilities.allows(command) {
            tracing::debug!(command = command.name(), "capability disabled, command ignored");
            return false;
        }
        instance.focused = true;

        if command.is_history() {
            let current = Snapshot::capture(&instance.state);
            let result = match command {
                EditorCommand::Redo => instance.history.redo(current),
                _ => instance.history.undo(current),
            };
            let Ok(snapshot) = result else {
                return false;
            };
            snapshot.restore(&mut instance.state);
            instance.html = to_html(instance.state.document(), &self.config);
            self.sink.document_changed(DocumentChanged {
                html: instance.html.clone(),
            });
            return true;
        }

        let before = Snapshot::capture(&instance.state);
        let handled = execute_command(&mut instance.state, command, &self.config);
        if instance.state.selection() != before.selection {
            // Moving the cursor disarms stored marks.
            instance.state.set_stored_marks(None);
        }
        if instance.state.document() == &before.document {
            return handled;
        }

        instance.history.record(before);
        instance.html = to_html(instance.state.document(), &self.config);
        tracing::trace!(
            command = command.name(),
            bytes = instance.html.len(),
            undo_depth = instance.history.undo_depth(),
            "document changed"
        );
        self.sink.document_changed(DocumentChanged {
            html: instance.html.clone(),
        });
        handled
    }

    pub fn undo(&mut self) -> bool {
        self.execute(&EditorCommand::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.execute(&EditorCommand::Redo)
    }

    pub fn can_undo(&self) -> bool {
        self.instance
            .as_ref()
            .is_some_and(|instance| instance.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.instance
            .as_ref()
            .is_some_and(|instance| instance.history.can_redo())
    }

    pub fn undo_depth(&self) -> usize {
        self.instance
            .as_ref()
            .map_or(0, |instance| instance.history.undo_depth())
    }

    /// Replace the whole document, clearing undo history.
    ///
    /// Fires [`DocumentChanged`] only when `emit_update` is set. Returns
    /// false if the editor is not mounted.
    pub fn set_content(&mut self, content: &str, emit_update: bool) -> bool {
        let Some(instance) = self.instance.as_mut() else {
            tracing::debug!(status = ?self.status, "editor not ready, content not set");
            return false;
        };
        let document = parse_or_empty(content, &self.config);
        instance.state = PlainEditor::new(document);
        instance.history.clear_history();
        instance.html = to_html(instance.state.document(), &self.config);
        self.sink.content_replaced(content);
        if emit_update {
            self.sink.document_changed(DocumentChanged {
                html: instance.html.clone(),
            });
        }
        true
    }

    pub fn focus(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.focused = true;
        }
    }

    pub fn blur(&mut self) {
        if let Some(instance) = self.instance.as_mut() {
            instance.focused = false;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.instance.as_ref().is_some_and(|instance| instance.focused)
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    /// The placeholder is visible while a mounted document is empty.
    pub fn shows_placeholder(&self) -> bool {
        self.document().is_some_and(Document::is_empty)
    }

    /// Link to follow for a click at `pos`, when clicking links is enabled.
    pub fn link_on_click(&self, pos: usize) -> Option<SmolStr> {
        if !self.config.link.open_on_click {
            return None;
        }
        let doc = self.document()?;
        let rp = doc.resolve(pos);
        let tb = doc.blocks()[rp.block].as_text()?;
        let mut link = None;
        tb.text_marks_in(rp.offset..rp.offset + 1, |marks| {
            if link.is_none() {
                link = marks.link.clone();
            }
        });
        link
    }
}
