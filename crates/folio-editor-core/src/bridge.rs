//! Two-way sync between an externally owned content string and the editor.
//!
//! The host re-renders with whatever value it holds for the content and
//! calls [`Editor::sync_content`]. Values the editor emitted itself are
//! recognised as echoes and never reset the document, even when the host
//! applies them late or batches several of them.

use std::collections::VecDeque;

use crate::editor::{ChangeSink, DocumentChanged, Editor};

/// Emitted values kept while waiting for the host to echo them.
pub const MAX_UNACKNOWLEDGED: usize = 64;

/// What [`Editor::sync_content`] did with an external value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The editor is not mounted. The value is picked up at mount instead.
    NotReady,
    /// The value is one the editor emitted.
    Echo,
    /// Same external value as the last sync.
    Unchanged,
    /// The editor already serializes to this value.
    InSync,
    /// The value came from outside and replaced the document.
    Replaced,
}

/// A [`ChangeSink`] forwarding content to the host's setter.
pub struct ContentBridge<F> {
    on_change: F,
    unacknowledged: VecDeque<String>,
    /// External value seen by the last sync, mount or replace.
    last_external: Option<String>,
}

impl<F> std::fmt::Debug for ContentBridge<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentBridge")
            .field("unacknowledged", &self.unacknowledged.len())
            .field("last_external", &self.last_external)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut(&str)> ContentBridge<F> {
    pub fn new(on_change: F) -> Self {
        Self {
            on_change,
            unacknowledged: VecDeque::new(),
            last_external: None,
        }
    }

    /// Number of emitted values the host has not echoed yet.
    pub fn pending_echoes(&self) -> usize {
        self.unacknowledged.len()
    }

    pub fn last_external(&self) -> Option<&str> {
        self.last_external.as_deref()
    }

    /// Acknowledge `value` and everything emitted before it.
    fn acknowledge(&mut self, value: &str) -> bool {
        match self.unacknowledged.iter().position(|emitted| emitted == value) {
            Some(index) => {
                self.unacknowledged.drain(..=index);
                true
            }
            None => false,
        }
    }
}

impl<F: FnMut(&str)> ChangeSink for ContentBridge<F> {
    fn document_changed(&mut self, event: DocumentChanged) {
        if self.unacknowledged.len() >= MAX_UNACKNOWLEDGED {
            self.unacknowledged.pop_front();
            tracing::trace!(target: "folio::bridge", "dropped oldest unacknowledged value");
        }
        (self.on_change)(&event.html);
        self.unacknowledged.push_back(event.html);
    }

    fn content_replaced(&mut self, content: &str) {
        self.unacknowledged.clear();
        self.last_external = Some(content.to_owned());
    }
}

impl<F: FnMut(&str)> Editor<ContentBridge<F>> {
    /// Reconcile the host's current content value with the editor.
    pub fn sync_content(&mut self, external: &str) -> SyncOutcome {
        let Some(html) = self.html() else {
            tracing::trace!(target: "folio::bridge", "sync before mount");
            return SyncOutcome::NotReady;
        };
        let in_sync = html == external;

        let bridge = self.sink_mut();
        let outcome = if bridge.acknowledge(external) {
            bridge.last_external = Some(external.to_owned());
            SyncOutcome::Echo
        } else if bridge.last_external.as_deref() == Some(external) {
            SyncOutcome::Unchanged
        } else if in_sync {
            bridge.last_external = Some(external.to_owned());
            SyncOutcome::InSync
        } else {
            self.set_content(external, false);
            SyncOutcome::Replaced
        };
        tracing::trace!(
            target: "folio::bridge",
            ?outcome,
            pending = self.sink().pending_echoes(),
            "content reconciled"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::document::EditorDocument;
    use crate::actions::EditorCommand;
    use crate::config::EditorConfig;
    use crate::types::Selection;

    type Setter = Box<dyn FnMut(&str)>;

    /// Editor wired to a host value the test controls.
    fn bridged(content: &str) -> (Editor<ContentBridge<Setter>>, Rc<RefCell<Vec<String>>>) {
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        let setter: Setter = Box::new(move |html: &str| sink.borrow_mut().push(html.to_owned()));
        let mut editor = Editor::new(EditorConfig::default(), content, ContentBridge::new(setter));
        editor.mount();
        (editor, emitted)
    }

    fn type_text(editor: &mut Editor<ContentBridge<Setter>>, text: &str) {
        editor.execute(&EditorCommand::InsertText(text.to_owned()));
    }

    #[test]
    fn test_not_ready() {
        let mut editor = Editor::new(EditorConfig::default(), "<p>a</p>", ContentBridge::new(|_: &str| {}));
        assert_eq!(editor.sync_content("<p>b</p>"), SyncOutcome::NotReady);
        editor.mount();
        assert_eq!(editor.sync_content("<p>a</p>"), SyncOutcome::Unchanged);
    }

    #[test]
    fn test_echo_keeps_history() {
        let (mut editor, emitted) = bridged("<p>a</p>");
        editor.execute(&EditorCommand::SetSelection(Selection::collapsed(1)));
        type_text(&mut editor, "b");
        let echoed = emitted.borrow().last().cloned().expect("one emission");
        assert_eq!(echoed, "<p>ab</p>");

        assert_eq!(editor.sync_content(&echoed), SyncOutcome::Echo);
        assert!(editor.can_undo());
        assert_eq!(editor.state().map(|s| s.selection()), Some(Selection::collapsed(2)));
    }

    #[test]
    fn test_stale_render_before_echo_is_ignored() {
        let (mut editor, _) = bridged("<p>a</p>");
        type_text(&mut editor, "x");
        // The host re-renders with its old value before applying ours.
        assert_eq!(editor.sync_content("<p>a</p>"), SyncOutcome::Unchanged);
        assert_eq!(editor.html(), Some("<p>xa</p>"));
    }

    #[test]
    fn test_batched_echoes() {
        let (mut editor, emitted) = bridged("");
        type_text(&mut editor, "a");
        type_text(&mut editor, "b");
        type_text(&mut editor, "c");
        assert_eq!(editor.sink().pending_echoes(), 3);

        // Only the latest value reaches the host.
        let last = emitted.borrow().last().cloned().expect("emitted");
        assert_eq!(editor.sync_content(&last), SyncOutcome::Echo);
        assert_eq!(editor.sink().pending_echoes(), 0);
        assert_eq!(editor.undo_depth(), 3);
    }

    #[test]
    fn test_late_intermediate_echo() {
        let (mut editor, emitted) = bridged("");
        type_text(&mut editor, "a");
        type_text(&mut editor, "b");
        let first = emitted.borrow()[0].clone();
        assert_eq!(editor.sync_content(&first), SyncOutcome::Echo);
        assert_eq!(editor.html(), Some("<p>ab</p>"));
        assert_eq!(editor.sink().pending_echoes(), 1);
    }

    #[test]
    fn test_external_change_replaces() {
        let (mut editor, emitted) = bridged("<p>a</p>");
        type_text(&mut editor, "z");
        assert_eq!(editor.sync_content("<h1>Loaded</h1>"), SyncOutcome::Replaced);
        assert_eq!(editor.html(), Some("<h1>Loaded</h1>"));
        assert!(!editor.can_undo());
        assert_eq!(editor.sink().pending_echoes(), 0);
        // Replacing from outside is not reported back.
        assert_eq!(emitted.borrow().len(), 1);
    }

    #[test]
    fn test_reverting_to_original_value_replaces() {
        let (mut editor, emitted) = bridged("<p>a</p>");
        type_text(&mut editor, "z");
        let echoed = emitted.borrow()[0].clone();
        assert_eq!(editor.sync_content(&echoed), SyncOutcome::Echo);
        assert_eq!(editor.sync_content("<p>a</p>"), SyncOutcome::Replaced);
        assert_eq!(editor.html(), Some("<p>a</p>"));
    }

    #[test]
    fn test_normalized_content_is_not_pushed_again() {
        let (mut editor, _) = bridged("<p>a   <b>b</b></p>");
        assert_eq!(editor.html(), Some("<p>a <strong>b</strong></p>"));
        type_text(&mut editor, "x");
        assert_eq!(editor.sync_content("<p>a   <b>b</b></p>"), SyncOutcome::Unchanged);
        assert!(editor.can_undo());
    }

    #[test]
    fn test_in_sync_value() {
        let (mut editor, _) = bridged("<p>a</p>");
        editor.sink_mut().last_external = None;
        assert_eq!(editor.sync_content("<p>a</p>"), SyncOutcome::InSync);
        assert_eq!(editor.sink().last_external(), Some("<p>a</p>"));
    }

    #[test]
    fn test_unacknowledged_queue_is_bounded() {
        let (mut editor, _) = bridged("");
        for _ in 0..MAX_UNACKNOWLEDGED + 5 {
            type_text(&mut editor, "a");
        }
        assert_eq!(editor.sink().pending_echoes(), MAX_UNACKNOWLEDGED);
    }
}
