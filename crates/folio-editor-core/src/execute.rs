//! Command execution against an [`EditorDocument`].
//!
//! Pure document manipulation: no history, no change notification. The
//! [`crate::Editor`] wraps this with both.

use std::ops::Range;

use smol_str::SmolStr;

use crate::actions::EditorCommand;
use crate::config::{AlignTarget, EditorConfig};
use crate::document::EditorDocument;
use crate::embed::video_src;
use crate::model::{
    Block, Container, Document, ImageNode, Inline, MarkKind, MarkSet, TextBlock, TextKind,
    TextRun, VideoEmbed,
};
use crate::types::{BlockType, Selection, TextAlign};

/// Execute a command against a document.
///
/// Returns true if the command was handled. A handled command may still leave
/// the document unchanged; callers compare states to detect mutations.
pub fn execute_command<D: EditorDocument>(
    doc: &mut D,
    command: &EditorCommand,
    config: &EditorConfig,
) -> bool {
    match command {
        EditorCommand::ToggleMark(kind) => execute_toggle_mark(doc, *kind),
        EditorCommand::SetColor(color) => {
            execute_set_marks(doc, |marks| marks.color = Some(color.clone()))
        }
        EditorCommand::UnsetColor => execute_set_marks(doc, |marks| marks.color = None),
        EditorCommand::ToggleHighlight => execute_toggle_mark(doc, MarkKind::Highlight),
        EditorCommand::SetHighlight(color) => {
            let color = config.highlight.multicolor.then(|| color.clone());
            execute_set_marks(doc, |marks| marks.highlight = Some(color.clone()))
        }
        EditorCommand::SetLink { href } => {
            execute_set_marks(doc, |marks| marks.link = Some(href.clone()))
        }
        EditorCommand::UnsetLink => execute_unset_link(doc),
        EditorCommand::SetBlock(block) => execute_set_block(doc, *block),
        EditorCommand::ToggleBlock(block) => execute_toggle_block(doc, *block),
        EditorCommand::SetAlignment(align) => execute_set_alignment(doc, *align, config),
        EditorCommand::UnsetAlignment => execute_set_alignment(doc, TextAlign::Left, config),
        EditorCommand::InsertImage { src } => execute_insert_image(doc, src, config),
        EditorCommand::InsertLink { href, text } => {
            execute_insert_link(doc, href, text.as_deref())
        }
        EditorCommand::InsertVideo { src } => execute_insert_video(doc, src, config),
        EditorCommand::InsertText(text) => execute_insert_text(doc, text),
        EditorCommand::InsertHardBreak => {
            doc.replace_selection(vec![Inline::HardBreak]);
            true
        }
        EditorCommand::SplitBlock => execute_split_block(doc),
        EditorCommand::DeleteBackward => execute_delete_backward(doc),
        EditorCommand::DeleteForward => execute_delete_forward(doc),
        EditorCommand::SetSelection(selection) => {
            doc.set_selection(*selection);
            true
        }
        EditorCommand::SelectAll => {
            doc.select_all();
            true
        }
        EditorCommand::Undo | EditorCommand::Redo => {
            // History is owned by the editor, not the document.
            false
        }
    }
}

/// Text with newlines turned into hard breaks. Other HTML whitespace
/// becomes a plain space.
fn text_inlines(text: &str, marks: &MarkSet) -> Vec<Inline> {
    let mut out = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Inline::HardBreak);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let line: String = line
            .chars()
            .map(|c| if matches!(c, '\t' | '\r' | '\u{c}') { ' ' } else { c })
            .collect();
        out.push(Inline::Text(TextRun::new(line, marks.clone())));
    }
    out
}

/// Apply `f` to the selected text, or to the stored marks at a cursor.
fn execute_set_marks<D: EditorDocument>(doc: &mut D, f: impl Fn(&mut MarkSet)) -> bool {
    let selection = doc.selection();
    if selection.is_collapsed() {
        let mut marks = doc.marks_for_insertion();
        f(&mut marks);
        doc.set_stored_marks(Some(marks));
    } else {
        doc.map_marks_in(selection.to_range(), f);
    }
    true
}

fn execute_toggle_mark<D: EditorDocument>(doc: &mut D, kind: MarkKind) -> bool {
    let on = !doc.is_mark_active(kind);
    execute_set_marks(doc, |marks| marks.set(kind, on))
}

fn execute_unset_link<D: EditorDocument>(doc: &mut D) -> bool {
    let selection = doc.selection();
    if !selection.is_collapsed() {
        doc.map_marks_in(selection.to_range(), |marks| marks.link = None);
        return true;
    }
    if let Some(mut stored) = doc.stored_marks().cloned() {
        stored.link = None;
        doc.set_stored_marks(Some(stored));
    }
    if let Some(range) = link_extent(doc.document(), selection.head) {
        doc.map_marks_in(range, |marks| marks.link = None);
    }
    true
}

/// The full range of the link touching `pos`.
fn link_extent(doc: &Document, pos: usize) -> Option<Range<usize>> {
    let rp = doc.resolve(pos);
    let tb = doc.blocks()[rp.block].as_text()?;
    let mut spans: Vec<(usize, usize, Option<&SmolStr>)> = Vec::with_capacity(tb.inlines.len());
    let mut at = 0;
    for inline in &tb.inlines {
        let len = inline.len();
        let link = inline.marks().and_then(|marks| marks.link.as_ref());
        spans.push((at, at + len, link));
        at += len;
    }

    let hit = spans
        .iter()
        .position(|&(lo, hi, link)| link.is_some() && lo <= rp.offset && rp.offset <= hi)?;
    let href = spans[hit].2;
    let mut first = hit;
    while first > 0 && spans[first - 1].2 == href {
        first -= 1;
    }
    let mut last = hit;
    while last + 1 < spans.len() && spans[last + 1].2 == href {
        last += 1;
    }
    let base = doc.block_start(rp.block);
    Some(base + spans[first].0..base + spans[last].1)
}

/// Run `f` over every selected text block. Returns false if there were none.
fn update_selected_blocks<D: EditorDocument>(doc: &mut D, mut f: impl FnMut(&mut TextBlock)) -> bool {
    let indices = doc.selected_text_blocks();
    if indices.is_empty() {
        return false;
    }
    let document = doc.document_mut();
    for index in indices {
        if let Some(tb) = document.blocks_mut()[index].as_text_mut() {
            f(tb);
        }
    }
    true
}

fn execute_set_block<D: EditorDocument>(doc: &mut D, block: BlockType) -> bool {
    update_selected_blocks(doc, |tb| match block {
        BlockType::Paragraph => tb.kind = TextKind::Paragraph,
        BlockType::Heading(level) => tb.kind = TextKind::Heading(level),
        BlockType::BulletList => tb.container = Some(Container::BulletList),
        BlockType::OrderedList => tb.container = Some(Container::OrderedList),
        BlockType::Blockquote => tb.container = Some(Container::Blockquote),
    })
}

fn execute_toggle_block<D: EditorDocument>(doc: &mut D, block: BlockType) -> bool {
    if !doc.is_block_active(block) {
        return execute_set_block(doc, block);
    }
    match block {
        BlockType::Paragraph => true,
        BlockType::Heading(_) => update_selected_blocks(doc, |tb| tb.kind = TextKind::Paragraph),
        BlockType::BulletList | BlockType::OrderedList | BlockType::Blockquote => {
            update_selected_blocks(doc, |tb| tb.container = None)
        }
    }
}

fn execute_set_alignment<D: EditorDocument>(
    doc: &mut D,
    align: TextAlign,
    config: &EditorConfig,
) -> bool {
    let mut applied = false;
    update_selected_blocks(doc, |tb| {
        let target = match tb.kind {
            TextKind::Paragraph => AlignTarget::Paragraph,
            TextKind::Heading(_) => AlignTarget::Heading,
        };
        if config.text_align.applies_to(target) {
            tb.align = align;
            applied = true;
        }
    });
    applied
}

fn execute_insert_image<D: EditorDocument>(doc: &mut D, src: &SmolStr, config: &EditorConfig) -> bool {
    if !config.image.accepts(src) {
        tracing::debug!(%src, "refusing base64 image source");
        return false;
    }
    doc.replace_selection(vec![Inline::Image(ImageNode::new(src.clone()))]);
    true
}

fn execute_insert_link<D: EditorDocument>(doc: &mut D, href: &SmolStr, text: Option<&str>) -> bool {
    match text.filter(|text| !text.is_empty()) {
        Some(text) => {
            let marks = MarkSet::default().with_link(href.clone());
            doc.replace_selection(text_inlines(text, &marks));
            true
        }
        None => execute_set_marks(doc, |marks| marks.link = Some(href.clone())),
    }
}

fn execute_insert_video<D: EditorDocument>(doc: &mut D, src: &str, config: &EditorConfig) -> bool {
    let src = video_src(src);
    if src.is_empty() {
        tracing::debug!("refusing empty video source");
        return false;
    }
    let video = VideoEmbed {
        src,
        width: config.video.width,
        height: config.video.height,
    };
    let selection = doc.selection();
    let document = doc.document_mut();
    let at = if selection.is_collapsed() {
        selection.head
    } else {
        document.delete_range(selection.to_range())
    };
    let index = document.insert_block(at, Block::Video(video));

    // Cursor moves past the video when a text block follows.
    let next_is_text = document
        .blocks()
        .get(index + 1)
        .is_some_and(|block| block.as_text().is_some());
    let cursor = if next_is_text {
        document.block_start(index + 1)
    } else {
        document.block_start(index)
    };
    doc.set_selection(Selection::collapsed(cursor));
    true
}

fn execute_insert_text<D: EditorDocument>(doc: &mut D, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let marks = doc.marks_for_insertion();
    doc.replace_selection(text_inlines(text, &marks));
    doc.set_stored_marks(None);
    true
}

enum SplitKind {
    /// Empty list item: leave the list instead of adding another item.
    LiftItem,
    /// Cursor on a video: start a paragraph after it.
    AfterVideo,
    Split,
}

fn execute_split_block<D: EditorDocument>(doc: &mut D) -> bool {
    let selection = doc.selection();
    let document = doc.document_mut();
    let at = if selection.is_collapsed() {
        selection.head
    } else {
        document.delete_range(selection.to_range())
    };
    let rp = document.resolve(at);

    let kind = match &document.blocks()[rp.block] {
        Block::Text(tb)
            if tb.is_empty()
                && matches!(
                    tb.container,
                    Some(Container::BulletList | Container::OrderedList)
                ) =>
        {
            SplitKind::LiftItem
        }
        Block::Text(_) => SplitKind::Split,
        Block::Video(_) => SplitKind::AfterVideo,
    };

    let cursor = match kind {
        SplitKind::LiftItem => {
            if let Some(tb) = document.blocks_mut()[rp.block].as_text_mut() {
                tb.container = None;
            }
            at
        }
        SplitKind::AfterVideo => {
            document
                .blocks_mut()
                .insert(rp.block + 1, Block::Text(TextBlock::default()));
            document.block_start(rp.block + 1)
        }
        SplitKind::Split => document.split_block(at).unwrap_or(at),
    };
    doc.set_selection(Selection::collapsed(cursor));
    true
}

/// Remove block `index`, returning the position where the cursor should land.
fn remove_block(document: &mut Document, index: usize) -> usize {
    document.blocks_mut().remove(index);
    document.normalize();
    if index == 0 {
        0
    } else {
        document.block_start(index - 1) + document.blocks()[index - 1].len()
    }
}

fn execute_delete_backward<D: EditorDocument>(doc: &mut D) -> bool {
    if doc.delete_selection() {
        return true;
    }
    let pos = doc.selection().head;
    let document = doc.document_mut();
    let rp = document.resolve(pos);

    let cursor = if rp.offset > 0 {
        if let Some(tb) = document.blocks_mut()[rp.block].as_text_mut() {
            tb.delete(rp.offset - 1..rp.offset);
        }
        pos - 1
    } else {
        match &document.blocks()[rp.block] {
            Block::Video(_) => remove_block(document, rp.block),
            Block::Text(tb) if tb.container.is_some() => {
                // Start of a wrapped block: unwrap before joining.
                if let Some(tb) = document.blocks_mut()[rp.block].as_text_mut() {
                    tb.container = None;
                }
                pos
            }
            Block::Text(_) => match document.join_backward(rp.block) {
                Some(at) => at,
                None => return false,
            },
        }
    };
    doc.set_selection(Selection::collapsed(cursor));
    true
}

fn execute_delete_forward<D: EditorDocument>(doc: &mut D) -> bool {
    if doc.delete_selection() {
        return true;
    }
    let pos = doc.selection().head;
    let document = doc.document_mut();
    let rp = document.resolve(pos);
    let block_count = document.blocks().len();

    let cursor = match &document.blocks()[rp.block] {
        Block::Video(_) => {
            document.blocks_mut().remove(rp.block);
            document.normalize();
            pos.min(document.size())
        }
        Block::Text(tb) if rp.offset < tb.len() => {
            if let Some(tb) = document.blocks_mut()[rp.block].as_text_mut() {
                tb.delete(rp.offset..rp.offset + 1);
            }
            pos
        }
        Block::Text(_) if rp.block + 1 < block_count => {
            if matches!(document.blocks()[rp.block + 1], Block::Video(_)) {
                document.blocks_mut().remove(rp.block + 1);
            } else {
                document.join_backward(rp.block + 1);
            }
            pos
        }
        Block::Text(_) => return false,
    };
    doc.set_selection(Selection::collapsed(cursor));
    true
}
