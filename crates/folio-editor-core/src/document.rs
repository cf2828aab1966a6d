//! Core editor document trait and implementations.
//!
//! Defines the `EditorDocument` trait for abstracting editor state, so the
//! command executor works against plain fields or any other storage a host
//! chooses, while sharing the formatting queries.

use std::ops::Range;

use smol_str::SmolStr;

use crate::model::{Block, Container, Document, Inline, MarkKind, MarkSet, TextKind};
use crate::types::{BlockType, Selection, TextAlign};

/// Core trait for editor documents.
///
/// Implementors provide storage for the document, the selection and the
/// stored marks. Everything else is derived.
pub trait EditorDocument {
    // === Required: Content ===

    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;

    // === Required: Selection state ===

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    // === Required: Stored marks ===

    /// Marks to apply to the next typed text, set by toggling a mark on a
    /// collapsed selection.
    fn stored_marks(&self) -> Option<&MarkSet>;

    fn set_stored_marks(&mut self, marks: Option<MarkSet>);

    // === Provided: Convenience accessors ===

    /// Largest valid position.
    fn size(&self) -> usize {
        self.document().size()
    }

    fn is_empty(&self) -> bool {
        self.document().is_empty()
    }

    fn cursor_offset(&self) -> usize {
        self.selection().head
    }

    fn set_cursor_offset(&mut self, offset: usize) {
        let offset = offset.min(self.size());
        self.set_selection(Selection::collapsed(offset));
    }

    fn select_all(&mut self) {
        let size = self.size();
        self.set_selection(Selection::new(0, size));
    }

    /// Plain text of the selection, blocks separated by newlines.
    fn selected_text(&self) -> Option<String> {
        let selection = self.selection();
        if selection.is_collapsed() {
            return None;
        }
        let doc = self.document();
        let parts: Vec<String> = doc
            .block_ranges(selection.to_range())
            .into_iter()
            .map(|(index, local)| match &doc.blocks()[index] {
                Block::Text(tb) => {
                    let mut out = String::new();
                    let mut pos = 0;
                    for inline in &tb.inlines {
                        let len = inline.len();
                        let (lo, hi) = (local.start.max(pos), local.end.min(pos + len));
                        if lo < hi {
                            match inline {
                                Inline::Text(run) => {
                                    out.extend(run.text.chars().skip(lo - pos).take(hi - lo))
                                }
                                Inline::HardBreak => out.push('\n'),
                                Inline::Image(_) => {}
                            }
                        }
                        pos += len;
                    }
                    out
                }
                Block::Video(_) => String::new(),
            })
            .collect();
        Some(parts.join("\n"))
    }

    /// Indices of text blocks touched by the selection.
    fn selected_text_blocks(&self) -> Vec<usize> {
        let doc = self.document();
        doc.block_ranges(self.selection().to_range())
            .into_iter()
            .filter(|(index, _)| doc.blocks()[*index].as_text().is_some())
            .map(|(index, _)| index)
            .collect()
    }

    // === Provided: Mutation ===

    /// Replace the selection with `content` and collapse after it.
    fn replace_selection(&mut self, content: Vec<Inline>) -> usize {
        let range = self.selection().to_range();
        let doc = self.document_mut();
        let at = if range.is_empty() {
            range.start
        } else {
            doc.delete_range(range)
        };
        let end = doc.insert_inlines(at, content);
        self.set_selection(Selection::collapsed(end));
        end
    }

    /// Delete the selected content. Returns false when nothing was selected.
    fn delete_selection(&mut self) -> bool {
        let selection = self.selection();
        if selection.is_collapsed() {
            return false;
        }
        let at = self.document_mut().delete_range(selection.to_range());
        self.set_selection(Selection::collapsed(at));
        true
    }

    /// Apply `f` to every text run in `range`.
    fn map_marks_in(&mut self, range: Range<usize>, mut f: impl FnMut(&mut MarkSet)) {
        let doc = self.document_mut();
        for (index, local) in doc.block_ranges(range) {
            if let Some(tb) = doc.blocks_mut()[index].as_text_mut() {
                tb.map_marks(local, &mut f);
            }
        }
    }

    // === Provided: Formatting queries ===

    /// Marks that typed text would receive right now.
    fn marks_for_insertion(&self) -> MarkSet {
        if let Some(stored) = self.stored_marks() {
            return stored.clone();
        }
        let selection = self.selection();
        if selection.is_collapsed() {
            return self.document().marks_at(selection.head);
        }
        let mut first = None;
        self.visit_selected_marks(|marks| {
            if first.is_none() {
                first = Some(marks.clone());
            }
        });
        first.unwrap_or_default()
    }

    /// Visit the marks of all selected text. Returns false if no text is selected.
    fn visit_selected_marks(&self, mut f: impl FnMut(&MarkSet)) -> bool {
        let doc = self.document();
        let mut visited = false;
        for (index, local) in doc.block_ranges(self.selection().to_range()) {
            if let Block::Text(tb) = &doc.blocks()[index] {
                visited |= tb.text_marks_in(local, &mut f);
            }
        }
        visited
    }

    /// True when `kind` applies to the cursor or to all selected text.
    fn is_mark_active(&self, kind: MarkKind) -> bool {
        if self.selection().is_collapsed() {
            return self.marks_for_insertion().has(kind);
        }
        let mut all = true;
        let visited = self.visit_selected_marks(|marks| all &= marks.has(kind));
        visited && all
    }

    /// The color shared by the cursor or the selected text.
    fn active_color(&self) -> Option<SmolStr> {
        self.shared_mark(|marks| marks.color.clone())
    }

    /// The link target shared by the cursor or the selected text.
    fn active_link(&self) -> Option<SmolStr> {
        if self.selection().is_collapsed() {
            // A collapsed cursor inside a link reports it even at the link's end.
            let doc = self.document();
            let rp = doc.resolve(self.selection().head);
            let tb = doc.blocks()[rp.block].as_text()?;
            let mut found = None;
            tb.text_marks_in(rp.offset.saturating_sub(1)..rp.offset.max(1), |marks| {
                if found.is_none() {
                    found = marks.link.clone();
                }
            });
            return found;
        }
        self.shared_mark(|marks| marks.link.clone())
    }

    /// A mark attribute present with the same value on all selected text.
    fn shared_mark<T: PartialEq>(&self, get: impl Fn(&MarkSet) -> Option<T>) -> Option<T> {
        if self.selection().is_collapsed() {
            return get(&self.marks_for_insertion());
        }
        let mut shared: Option<Option<T>> = None;
        self.visit_selected_marks(|marks| {
            let value = get(marks);
            shared = match shared.take() {
                None => Some(value),
                Some(prev) if prev == value => Some(prev),
                Some(_) => Some(None),
            };
        });
        shared.flatten()
    }

    /// True when every selected text block has the given block type.
    fn is_block_active(&self, block: BlockType) -> bool {
        let indices = self.selected_text_blocks();
        if indices.is_empty() {
            return false;
        }
        let doc = self.document();
        indices.iter().all(|&index| {
            let Some(tb) = doc.blocks()[index].as_text() else {
                return false;
            };
            match block {
                BlockType::Paragraph => tb.kind == TextKind::Paragraph,
                BlockType::Heading(level) => tb.kind == TextKind::Heading(level),
                BlockType::BulletList => tb.container == Some(Container::BulletList),
                BlockType::OrderedList => tb.container == Some(Container::OrderedList),
                BlockType::Blockquote => tb.container == Some(Container::Blockquote),
            }
        })
    }

    /// Alignment shared by every selected text block.
    fn active_alignment(&self) -> Option<TextAlign> {
        let doc = self.document();
        let mut shared = None;
        for index in self.selected_text_blocks() {
            let align = doc.blocks()[index].as_text()?.align;
            match shared {
                None => shared = Some(align),
                Some(prev) if prev != align => return None,
                Some(_) => {}
            }
        }
        shared
    }
}

/// Simple field-based implementation of [`EditorDocument`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlainEditor {
    document: Document,
    selection: Selection,
    stored_marks: Option<MarkSet>,
}

impl PlainEditor {
    /// Create an editor over `document` with the cursor at the start.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: Selection::default(),
            stored_marks: None,
        }
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl EditorDocument for PlainEditor {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(self.document.size());
    }

    fn stored_marks(&self) -> Option<&MarkSet> {
        self.stored_marks.as_ref()
    }

    fn set_stored_marks(&mut self, marks: Option<MarkSet>) {
        self.stored_marks = marks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextBlock, TextRun};

    fn editor(runs: Vec<Inline>) -> PlainEditor {
        PlainEditor::new(Document::from_blocks(vec![TextBlock::paragraph(runs).into()]))
    }

    fn bold(text: &str) -> Inline {
        Inline::Text(TextRun::new(text, MarkSet::default().with(MarkKind::Bold)))
    }

    fn plain(text: &str) -> Inline {
        Inline::Text(TextRun::plain(text))
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut ed = editor(vec![plain("abc")]);
        ed.set_selection(Selection::new(1, 50));
        assert_eq!(ed.selection(), Selection::new(1, 3));
    }

    #[test]
    fn test_selected_text() {
        let mut ed = editor(vec![plain("hello world")]);
        assert_eq!(ed.selected_text(), None);
        ed.set_selection(Selection::new(6, 11));
        assert_eq!(ed.selected_text().as_deref(), Some("world"));
    }

    #[test]
    fn test_mark_active_needs_all_text() {
        let mut ed = editor(vec![bold("ab"), plain("cd")]);
        ed.set_selection(Selection::new(0, 2));
        assert!(ed.is_mark_active(MarkKind::Bold));
        ed.set_selection(Selection::new(1, 3));
        assert!(!ed.is_mark_active(MarkKind::Bold));
    }

    #[test]
    fn test_cursor_uses_stored_marks() {
        let mut ed = editor(vec![plain("ab")]);
        ed.set_cursor_offset(1);
        assert!(!ed.is_mark_active(MarkKind::Italic));
        ed.set_stored_marks(Some(MarkSet::default().with(MarkKind::Italic)));
        assert!(ed.is_mark_active(MarkKind::Italic));
    }

    #[test]
    fn test_replace_selection() {
        let mut ed = editor(vec![plain("hello world")]);
        ed.set_selection(Selection::new(0, 5));
        let end = ed.replace_selection(vec![plain("bye")]);
        assert_eq!(end, 3);
        assert_eq!(ed.document().text_content(), "bye world");
        assert_eq!(ed.selection(), Selection::collapsed(3));
    }

    #[test]
    fn test_shared_color() {
        let red = MarkSet::default().with_color("#FF0000");
        let mut ed = editor(vec![
            Inline::Text(TextRun::new("ab", red.clone())),
            Inline::Text(TextRun::new("cd", red.with(MarkKind::Bold))),
        ]);
        ed.set_selection(Selection::new(0, 4));
        assert_eq!(ed.active_color().as_deref(), Some("#FF0000"));
        ed.document_mut().blocks_mut()[0]
            .as_text_mut()
            .expect("text block")
            .map_marks(3..4, |m| m.color = None);
        assert_eq!(ed.active_color(), None);
    }

    #[test]
    fn test_active_link_at_cursor() {
        let mut ed = editor(vec![
            Inline::Text(TextRun::new("go", MarkSet::default().with_link("https://x.test"))),
            plain(" on"),
        ]);
        ed.set_cursor_offset(2);
        assert_eq!(ed.active_link().as_deref(), Some("https://x.test"));
        ed.set_cursor_offset(4);
        assert_eq!(ed.active_link(), None);
    }

    #[test]
    fn test_block_queries() {
        let mut ed = PlainEditor::new(Document::from_blocks(vec![
            TextBlock::paragraph(vec![plain("a")])
                .with_container(Container::BulletList)
                .with_align(TextAlign::Center)
                .into(),
            TextBlock::paragraph(vec![plain("b")])
                .with_container(Container::BulletList)
                .into(),
        ]));
        ed.select_all();
        assert!(ed.is_block_active(BlockType::BulletList));
        assert!(ed.is_block_active(BlockType::Paragraph));
        assert!(!ed.is_block_active(BlockType::OrderedList));
        assert_eq!(ed.active_alignment(), None);
        ed.set_cursor_offset(0);
        assert_eq!(ed.active_alignment(), Some(TextAlign::Center));
    }
}
