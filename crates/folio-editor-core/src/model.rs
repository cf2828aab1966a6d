//! Rich document model.
//!
//! A [`Document`] is a flat, non-empty list of [`Block`]s. Text blocks carry
//! their wrapper (list or blockquote) as an attribute instead of nesting, so
//! every position in the document can be addressed by a single offset:
//!
//! ```text
//! <p>ab</p><ul><li><p>c</p></li></ul>
//!  0 1 2    3            4
//! ```
//!
//! Block `i` spans `len(i) + 1` positions: its content plus one boundary
//! position separating it from the next block. Inline atoms (images, hard
//! breaks) count as one position; a video block has no content positions.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::{HeadingLevel, TextAlign};

/// Marks that can be toggled on and off without attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Highlight,
}

impl MarkKind {
    pub const ALL: [MarkKind; 6] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strike,
        Self::Code,
        Self::Highlight,
    ];
}

/// A single mark with its attributes, in serialization order (outermost first).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    Link(SmolStr),
    Color(SmolStr),
    Highlight(Option<SmolStr>),
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
}

/// The set of marks applied to a text run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MarkSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub code: bool,
    /// Highlight, optionally with an explicit background color.
    pub highlight: Option<Option<SmolStr>>,
    /// Text color (CSS color value).
    pub color: Option<SmolStr>,
    /// Link target.
    pub link: Option<SmolStr>,
}

impl MarkSet {
    pub fn is_empty(&self) -> bool {
        *self == MarkSet::default()
    }

    pub fn has(&self, kind: MarkKind) -> bool {
        match kind {
            MarkKind::Bold => self.bold,
            MarkKind::Italic => self.italic,
            MarkKind::Underline => self.underline,
            MarkKind::Strike => self.strike,
            MarkKind::Code => self.code,
            MarkKind::Highlight => self.highlight.is_some(),
        }
    }

    pub fn set(&mut self, kind: MarkKind, on: bool) {
        match kind {
            MarkKind::Bold => self.bold = on,
            MarkKind::Italic => self.italic = on,
            MarkKind::Underline => self.underline = on,
            MarkKind::Strike => self.strike = on,
            MarkKind::Code => self.code = on,
            MarkKind::Highlight => {
                if !on {
                    self.highlight = None;
                } else if self.highlight.is_none() {
                    self.highlight = Some(None);
                }
            }
        }
    }

    pub fn with(mut self, kind: MarkKind) -> Self {
        self.set(kind, true);
        self
    }

    pub fn with_link(mut self, href: impl Into<SmolStr>) -> Self {
        self.link = Some(href.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<SmolStr>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Marks in serialization order, outermost first.
    pub fn ordered(&self) -> Vec<Mark> {
        let mut marks = Vec::new();
        if let Some(href) = &self.link {
            marks.push(Mark::Link(href.clone()));
        }
        if let Some(color) = &self.color {
            marks.push(Mark::Color(color.clone()));
        }
        if let Some(highlight) = &self.highlight {
            marks.push(Mark::Highlight(highlight.clone()));
        }
        if self.bold {
            marks.push(Mark::Bold);
        }
        if self.italic {
            marks.push(Mark::Italic);
        }
        if self.underline {
            marks.push(Mark::Underline);
        }
        if self.strike {
            marks.push(Mark::Strike);
        }
        if self.code {
            marks.push(Mark::Code);
        }
        marks
    }

    /// Add a single mark to the set.
    pub fn add(&mut self, mark: Mark) {
        match mark {
            Mark::Link(href) => self.link = Some(href),
            Mark::Color(color) => self.color = Some(color),
            Mark::Highlight(color) => self.highlight = Some(color),
            Mark::Bold => self.bold = true,
            Mark::Italic => self.italic = true,
            Mark::Underline => self.underline = true,
            Mark::Strike => self.strike = true,
            Mark::Code => self.code = true,
        }
    }
}

/// A run of text sharing one mark set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub marks: MarkSet,
}

impl TextRun {
    pub fn new(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, MarkSet::default())
    }
}

/// Inline image atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageNode {
    pub src: SmolStr,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl ImageNode {
    pub fn new(src: impl Into<SmolStr>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            title: None,
        }
    }
}

/// Inline content of a text block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(TextRun),
    Image(ImageNode),
    HardBreak,
}

impl Inline {
    /// Number of positions this inline occupies.
    pub fn len(&self) -> usize {
        match self {
            Inline::Text(run) => run.text.chars().count(),
            Inline::Image(_) | Inline::HardBreak => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn marks(&self) -> Option<&MarkSet> {
        match self {
            Inline::Text(run) => Some(&run.marks),
            _ => None,
        }
    }
}

/// Kind of a text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextKind {
    #[default]
    Paragraph,
    Heading(HeadingLevel),
}

/// Wrapper a text block lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    BulletList,
    OrderedList,
    Blockquote,
}

/// Paragraph or heading, optionally wrapped in a list item or blockquote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: TextKind,
    pub container: Option<Container>,
    pub align: TextAlign,
    pub inlines: Vec<Inline>,
}

/// Embedded video player (block atom).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoEmbed {
    pub src: SmolStr,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Text(TextBlock),
    Video(VideoEmbed),
}

impl Block {
    pub fn len(&self) -> usize {
        match self {
            Block::Text(tb) => tb.len(),
            Block::Video(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(tb) => Some(tb),
            Block::Video(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self {
            Block::Text(tb) => Some(tb),
            Block::Video(_) => None,
        }
    }
}

impl From<TextBlock> for Block {
    fn from(tb: TextBlock) -> Self {
        Block::Text(tb)
    }
}

/// Convert a char offset into a byte offset within `s`.
fn byte_offset(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

/// Split `inlines` so that a boundary falls exactly at `offset`.
///
/// Returns the index of the first inline at or after `offset`.
fn split_inlines(inlines: &mut Vec<Inline>, offset: usize) -> usize {
    let mut pos = 0;
    for i in 0..inlines.len() {
        if pos == offset {
            return i;
        }
        let len = inlines[i].len();
        if offset < pos + len {
            let tail = match &mut inlines[i] {
                Inline::Text(run) => {
                    let at = byte_offset(&run.text, offset - pos);
                    TextRun {
                        text: run.text.split_off(at),
                        marks: run.marks.clone(),
                    }
                }
                _ => return i + 1,
            };
            inlines.insert(i + 1, Inline::Text(tail));
            return i + 1;
        }
        pos += len;
    }
    inlines.len()
}

/// Merge adjacent runs with equal marks and drop empty runs.
pub(crate) fn normalize_inlines(inlines: &mut Vec<Inline>) {
    let mut out: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        match inline {
            Inline::Text(run) if run.text.is_empty() => {}
            Inline::Text(run) => match out.last_mut() {
                Some(Inline::Text(prev)) if prev.marks == run.marks => prev.text.push_str(&run.text),
                _ => out.push(Inline::Text(run)),
            },
            other => out.push(other),
        }
    }
    *inlines = out;
}

impl TextBlock {
    pub fn paragraph(inlines: Vec<Inline>) -> Self {
        let mut block = Self {
            inlines,
            ..Self::default()
        };
        block.normalize();
        block
    }

    pub fn heading(level: HeadingLevel, inlines: Vec<Inline>) -> Self {
        let mut block = Self::paragraph(inlines);
        block.kind = TextKind::Heading(level);
        block
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// A fresh empty block carrying this block's container.
    pub fn sibling(&self) -> Self {
        Self {
            container: self.container,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.inlines.iter().map(Inline::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    /// Plain text of the block; atoms are skipped, hard breaks become `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text(run) => out.push_str(&run.text),
                Inline::HardBreak => out.push('\n'),
                Inline::Image(_) => {}
            }
        }
        out
    }

    pub fn normalize(&mut self) {
        normalize_inlines(&mut self.inlines);
    }

    /// Split off and return everything after `offset`.
    pub fn split_off(&mut self, offset: usize) -> Vec<Inline> {
        let idx = split_inlines(&mut self.inlines, offset);
        let tail = self.inlines.split_off(idx);
        self.normalize();
        tail
    }

    /// Insert inline content at `offset`.
    pub fn insert(&mut self, offset: usize, content: Vec<Inline>) {
        let offset = offset.min(self.len());
        let idx = split_inlines(&mut self.inlines, offset);
        self.inlines.splice(idx..idx, content);
        self.normalize();
    }

    /// Delete a local range of positions.
    pub fn delete(&mut self, range: Range<usize>) {
        let len = self.len();
        let end = range.end.min(len);
        let start = range.start.min(end);
        let from = split_inlines(&mut self.inlines, start);
        let to = split_inlines(&mut self.inlines, end);
        self.inlines.drain(from..to);
        self.normalize();
    }

    /// Apply `f` to the marks of every text run inside `range`.
    pub fn map_marks(&mut self, range: Range<usize>, mut f: impl FnMut(&mut MarkSet)) {
        let len = self.len();
        let end = range.end.min(len);
        let start = range.start.min(end);
        if start == end {
            return;
        }
        let from = split_inlines(&mut self.inlines, start);
        let to = split_inlines(&mut self.inlines, end);
        for inline in &mut self.inlines[from..to] {
            if let Inline::Text(run) = inline {
                f(&mut run.marks);
            }
        }
        self.normalize();
    }

    /// Visit the mark sets of text inside `range`. Returns `false` if no text was visited.
    pub fn text_marks_in(&self, range: Range<usize>, mut f: impl FnMut(&MarkSet)) -> bool {
        let mut visited = false;
        let mut pos = 0;
        for inline in &self.inlines {
            let len = inline.len();
            let (lo, hi) = (pos, pos + len);
            pos = hi;
            if hi <= range.start || lo >= range.end {
                continue;
            }
            if let Inline::Text(run) = inline {
                visited = true;
                f(&run.marks);
            }
        }
        visited
    }

    /// Marks that text typed at `offset` would inherit.
    ///
    /// Links are non-inclusive: they do not extend past their end.
    pub fn marks_at(&self, offset: usize) -> MarkSet {
        let mut pos = 0;
        let mut before: Option<&Inline> = None;
        let mut after: Option<&Inline> = None;
        for inline in &self.inlines {
            let len = inline.len();
            if offset > pos && offset <= pos + len {
                before = Some(inline);
            }
            if offset >= pos && offset < pos + len {
                after = Some(inline);
            }
            pos += len;
        }

        let Some(node) = before.or(after) else {
            return MarkSet::default();
        };
        let mut marks = node.marks().cloned().unwrap_or_default();
        if marks.link.is_some() {
            let continues = after
                .and_then(Inline::marks)
                .is_some_and(|m| m.link == marks.link);
            if !continues {
                marks.link = None;
            }
        }
        marks
    }
}

/// A position resolved to a block and an offset inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPos {
    pub block: usize,
    pub offset: usize,
}

/// The rich document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// A document holding one empty paragraph.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::Text(TextBlock::default())],
        }
    }

    /// Build a document from blocks, normalizing inline content.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// True when the document is a single empty paragraph-like block.
    pub fn is_empty(&self) -> bool {
        matches!(self.blocks.as_slice(), [Block::Text(tb)] if tb.is_empty())
    }

    pub fn normalize(&mut self) {
        for block in &mut self.blocks {
            if let Block::Text(tb) = block {
                tb.normalize();
            }
        }
        if self.blocks.is_empty() {
            self.blocks.push(Block::Text(TextBlock::default()));
        }
    }

    /// Largest valid position.
    pub fn size(&self) -> usize {
        let content: usize = self.blocks.iter().map(Block::len).sum();
        content + self.blocks.len().saturating_sub(1)
    }

    /// Position of the start of block `index`.
    pub fn block_start(&self, index: usize) -> usize {
        self.blocks[..index.min(self.blocks.len())]
            .iter()
            .map(|b| b.len() + 1)
            .sum()
    }

    /// Resolve a flat position, clamping to the document end.
    pub fn resolve(&self, pos: usize) -> ResolvedPos {
        let mut start = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            let len = block.len();
            if pos <= start + len {
                return ResolvedPos {
                    block: index,
                    offset: pos - start,
                };
            }
            start += len + 1;
        }
        let last = self.blocks.len() - 1;
        ResolvedPos {
            block: last,
            offset: self.blocks[last].len(),
        }
    }

    /// Blocks touched by `range`, with the local range inside each block.
    pub fn block_ranges(&self, range: Range<usize>) -> Vec<(usize, Range<usize>)> {
        let mut out = Vec::new();
        let mut start = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            let len = block.len();
            let end = start + len;
            if start <= range.end && range.start <= end {
                let lo = range.start.max(start) - start;
                let hi = range.end.min(end) - start;
                out.push((index, lo..hi));
            }
            start = end + 1;
        }
        out
    }

    /// Plain text, blocks separated by newlines.
    pub fn text_content(&self) -> String {
        self.blocks
            .iter()
            .map(|b| match b {
                Block::Text(tb) => tb.text(),
                Block::Video(_) => String::new(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Marks typed text at `pos` would inherit.
    pub fn marks_at(&self, pos: usize) -> MarkSet {
        let rp = self.resolve(pos);
        match &self.blocks[rp.block] {
            Block::Text(tb) => tb.marks_at(rp.offset),
            Block::Video(_) => MarkSet::default(),
        }
    }

    /// Delete `range`, joining the blocks at its ends. Returns the resulting position.
    pub fn delete_range(&mut self, range: Range<usize>) -> usize {
        let from = self.resolve(range.start);
        let to = self.resolve(range.end.max(range.start));
        if from.block == to.block {
            if let Block::Text(tb) = &mut self.blocks[from.block] {
                tb.delete(from.offset..to.offset);
            }
            return self.block_start(from.block) + from.offset;
        }

        let tail = match &mut self.blocks[to.block] {
            Block::Text(tb) => tb.split_off(to.offset),
            Block::Video(_) => Vec::new(),
        };
        let head_is_text = matches!(self.blocks[from.block], Block::Text(_));
        if head_is_text {
            if let Block::Text(tb) = &mut self.blocks[from.block] {
                tb.split_off(from.offset);
                tb.inlines.extend(tail);
                tb.normalize();
            }
            self.blocks.drain(from.block + 1..=to.block);
        } else {
            // Range starts on a video: it goes away with the rest.
            let mut replacement = match &self.blocks[to.block] {
                Block::Text(tb) => tb.sibling(),
                Block::Video(_) => TextBlock::default(),
            };
            replacement.inlines = tail;
            replacement.normalize();
            self.blocks
                .splice(from.block..=to.block, [Block::Text(replacement)]);
        }
        self.normalize();
        self.block_start(from.block) + from.offset
    }

    /// Make sure `pos` sits inside a text block, inserting an empty paragraph
    /// after a video when needed. Returns the resolved text position.
    pub fn ensure_text_at(&mut self, pos: usize) -> ResolvedPos {
        let rp = self.resolve(pos);
        match &self.blocks[rp.block] {
            Block::Text(_) => rp,
            Block::Video(_) => {
                self.blocks
                    .insert(rp.block + 1, Block::Text(TextBlock::default()));
                ResolvedPos {
                    block: rp.block + 1,
                    offset: 0,
                }
            }
        }
    }

    /// Insert inline content at `pos`. Returns the position after the insertion.
    pub fn insert_inlines(&mut self, pos: usize, content: Vec<Inline>) -> usize {
        let inserted: usize = content.iter().map(Inline::len).sum();
        let rp = self.ensure_text_at(pos);
        if let Block::Text(tb) = &mut self.blocks[rp.block] {
            tb.insert(rp.offset, content);
        }
        self.block_start(rp.block) + rp.offset + inserted
    }

    /// Insert a block at `pos`, splitting the text block there.
    ///
    /// Empty halves of the split block are dropped. Returns the index of the
    /// inserted block.
    pub fn insert_block(&mut self, pos: usize, block: Block) -> usize {
        let rp = self.resolve(pos);
        let Block::Text(tb) = &mut self.blocks[rp.block] else {
            self.blocks.insert(rp.block + 1, block);
            return rp.block + 1;
        };

        let mut right = tb.sibling();
        right.kind = tb.kind;
        right.align = tb.align;
        right.inlines = tb.split_off(rp.offset);
        let left = (!tb.is_empty()).then(|| Block::Text(tb.clone()));

        let mut replacement = Vec::with_capacity(3);
        replacement.extend(left);
        let index = rp.block + replacement.len();
        replacement.push(block);
        if !right.is_empty() {
            replacement.push(Block::Text(right));
        }
        self.blocks.splice(rp.block..=rp.block, replacement);
        index
    }

    /// Split the text block at `pos` into two. Returns the position at the
    /// start of the new block, or `None` if `pos` is not inside a text block.
    pub fn split_block(&mut self, pos: usize) -> Option<usize> {
        let rp = self.resolve(pos);
        let Block::Text(tb) = &mut self.blocks[rp.block] else {
            return None;
        };
        let at_end = rp.offset == tb.len();
        let mut right = tb.sibling();
        right.align = tb.align;
        // Splitting a heading at its end continues with a paragraph.
        right.kind = if at_end { TextKind::Paragraph } else { tb.kind };
        right.inlines = tb.split_off(rp.offset);
        right.normalize();
        self.blocks.insert(rp.block + 1, Block::Text(right));
        Some(self.block_start(rp.block + 1))
    }

    /// Join block `index` into the previous block. Returns the join position.
    pub fn join_backward(&mut self, index: usize) -> Option<usize> {
        if index == 0 || index >= self.blocks.len() {
            return None;
        }
        let prev_is_video = matches!(self.blocks[index - 1], Block::Video(_));
        let current_is_video = matches!(self.blocks[index], Block::Video(_));
        match (prev_is_video, current_is_video) {
            (true, _) => {
                // Backspace after a video removes the video.
                self.blocks.remove(index - 1);
                self.normalize();
                Some(self.block_start(index - 1))
            }
            (false, true) => {
                self.blocks.remove(index);
                let prev = index - 1;
                Some(self.block_start(prev) + self.blocks[prev].len())
            }
            (false, false) => {
                let Block::Text(current) = self.blocks.remove(index) else {
                    return None;
                };
                let prev = index - 1;
                let join_at = self.block_start(prev) + self.blocks[prev].len();
                if let Block::Text(tb) = &mut self.blocks[prev] {
                    tb.inlines.extend(current.inlines);
                    tb.normalize();
                }
                Some(join_at)
            }
        }
    }
}
