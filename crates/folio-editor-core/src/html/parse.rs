//! Element tree to [`Document`].
//!
//! Unknown elements are unwrapped (their content is kept) and unknown
//! attributes are ignored. Markup for a capability the configuration
//! disables is unwrapped the same way, so the resulting document only ever
//! contains enabled formatting.

use smol_str::SmolStr;

use super::tree::{Element, Node};
use crate::config::{AlignTarget, EditorConfig};
use crate::embed::video_src;
use crate::model::{
    Block, Container, Document, ImageNode, Inline, MarkSet, TextBlock, TextKind, TextRun,
    VideoEmbed,
};
use crate::types::{HeadingLevel, TextAlign};

/// Elements whose content is never editor text.
const SKIPPED: &[&str] = &["head", "script", "style", "title", "template", "noscript"];

/// Wrapper elements unwrapped into their block content.
const BLOCK_LEVEL: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
    "div",
    "pre",
    "hr",
    "section",
    "article",
    "header",
    "footer",
    "main",
    "body",
    "html",
    "table",
    "tr",
    "iframe",
];

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0c}')
}

pub(crate) struct DocumentBuilder<'c> {
    config: &'c EditorConfig,
    blocks: Vec<Block>,
    /// Open implicit paragraph collecting loose inline content.
    pending: Option<TextBlock>,
}

impl<'c> DocumentBuilder<'c> {
    pub fn new(config: &'c EditorConfig) -> Self {
        Self {
            config,
            blocks: Vec::new(),
            pending: None,
        }
    }

    pub fn finish(mut self) -> Document {
        self.flush();
        Document::from_blocks(self.blocks)
    }

    fn flush(&mut self) {
        if let Some(mut block) = self.pending.take() {
            trim_trailing_space(&mut block);
            block.normalize();
            if !block.is_empty() {
                self.blocks.push(Block::Text(block));
            }
        }
    }

    fn push_block(&mut self, mut block: TextBlock) {
        self.flush();
        trim_trailing_space(&mut block);
        block.normalize();
        self.blocks.push(Block::Text(block));
    }

    pub fn blocks(&mut self, nodes: &[Node], container: Option<Container>) {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    if self.pending.is_none() && text.chars().all(is_whitespace) {
                        continue;
                    }
                    let target = self.pending.get_or_insert_with(|| TextBlock {
                        container,
                        ..TextBlock::default()
                    });
                    push_text(target, text, &MarkSet::default());
                }
                Node::Element(el) => self.block_element(el, container),
            }
        }
    }

    fn block_element(&mut self, el: &Element, container: Option<Container>) {
        let caps = self.config.capabilities;
        match el.name.as_str() {
            "p" => self.text_block(el, TextKind::Paragraph, container),
            "h1" | "h2" | "h3" if caps.headings => {
                let level = el.name[1..]
                    .parse::<u8>()
                    .ok()
                    .and_then(HeadingLevel::new)
                    .unwrap_or(HeadingLevel::H1);
                self.text_block(el, TextKind::Heading(level), container);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.text_block(el, TextKind::Paragraph, container)
            }
            "ul" if caps.bullet_list => self.list(el, Container::BulletList),
            "ol" if caps.ordered_list => self.list(el, Container::OrderedList),
            "blockquote" if caps.blockquote => {
                self.flush();
                self.blocks(&el.children, Some(Container::Blockquote));
                self.flush();
            }
            "div" if el.has_attr("data-youtube-video") => {
                self.flush();
                if let Some(iframe) = el.find("iframe") {
                    self.video(iframe);
                }
            }
            "iframe" => {
                self.flush();
                self.video(el);
            }
            "br" if self.pending.is_none() => {
                // A break between blocks carries no content.
            }
            "hr" => self.flush(),
            name if SKIPPED.contains(&name) => {}
            name if BLOCK_LEVEL.contains(&name) => {
                self.flush();
                self.blocks(&el.children, container);
                self.flush();
            }
            _ => {
                let target = self.pending.get_or_insert_with(|| TextBlock {
                    container,
                    ..TextBlock::default()
                });
                inline_element(self.config, el, &MarkSet::default(), target);
            }
        }
    }

    fn text_block(&mut self, el: &Element, kind: TextKind, container: Option<Container>) {
        let mut block = TextBlock {
            kind,
            container,
            align: self.alignment(el, kind),
            inlines: Vec::new(),
        };
        inline_children(self.config, &el.children, &MarkSet::default(), &mut block);
        self.push_block(block);
    }

    fn alignment(&self, el: &Element, kind: TextKind) -> TextAlign {
        if !self.config.capabilities.text_align {
            return TextAlign::default();
        }
        let target = match kind {
            TextKind::Paragraph => AlignTarget::Paragraph,
            TextKind::Heading(_) => AlignTarget::Heading,
        };
        if !self.config.text_align.applies_to(target) {
            return TextAlign::default();
        }
        el.style("text-align")
            .and_then(TextAlign::from_css)
            .unwrap_or_default()
    }

    fn list(&mut self, el: &Element, container: Container) {
        self.flush();
        for child in &el.children {
            match child {
                Node::Element(item) if item.name == "li" => {
                    let before = self.blocks.len();
                    self.blocks(&item.children, Some(container));
                    self.flush();
                    if self.blocks.len() == before {
                        self.blocks
                            .push(Block::Text(TextBlock::default().with_container(container)));
                    }
                }
                other => self.blocks(std::slice::from_ref(other), Some(container)),
            }
        }
        self.flush();
    }

    fn video(&mut self, iframe: &Element) {
        if !self.config.capabilities.video {
            return;
        }
        let Some(src) = iframe.attr("src").filter(|s| !s.trim().is_empty()) else {
            return;
        };
        let size = self.config.video;
        let dimension = |name: &str, default: u32| {
            iframe
                .attr(name)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };
        self.blocks.push(Block::Video(VideoEmbed {
            src: video_src(src),
            width: dimension("width", size.width),
            height: dimension("height", size.height),
        }));
    }
}

fn inline_children(config: &EditorConfig, nodes: &[Node], marks: &MarkSet, target: &mut TextBlock) {
    for node in nodes {
        match node {
            Node::Text(text) => push_text(target, text, marks),
            Node::Element(el) => inline_element(config, el, marks, target),
        }
    }
}

fn inline_element(config: &EditorConfig, el: &Element, marks: &MarkSet, target: &mut TextBlock) {
    let caps = &config.capabilities;
    let mut marks = marks.clone();
    match el.name.as_str() {
        "br" => {
            target.inlines.push(Inline::HardBreak);
            return;
        }
        "img" => {
            let src = el
                .attr("src")
                .filter(|src| caps.image && config.image.accepts(src));
            if let Some(src) = src {
                target.inlines.push(Inline::Image(ImageNode {
                    src: SmolStr::new(src),
                    alt: el.attr("alt").map(str::to_string),
                    title: el.attr("title").map(str::to_string),
                }));
            }
            return;
        }
        name if SKIPPED.contains(&name) => return,
        "strong" | "b" if caps.bold => marks.bold = true,
        "em" | "i" if caps.italic => marks.italic = true,
        "u" if caps.underline => marks.underline = true,
        "s" | "del" | "strike" if caps.strike => marks.strike = true,
        "code" if caps.code => marks.code = true,
        "mark" if caps.highlight => {
            let color = config
                .highlight
                .multicolor
                .then(|| {
                    el.attr("data-color")
                        .filter(|c| !c.is_empty())
                        .or_else(|| el.style("background-color"))
                })
                .flatten();
            marks.highlight = Some(color.map(SmolStr::new));
        }
        "a" if caps.link => {
            if let Some(href) = el.attr("href") {
                marks.link = Some(SmolStr::new(href));
            }
        }
        _ => {}
    }
    if caps.color {
        let color = el
            .style("color")
            .filter(|c| !c.eq_ignore_ascii_case("inherit"));
        if let Some(color) = color {
            marks.color = Some(SmolStr::new(color));
        }
    }
    inline_children(config, &el.children, &marks, target);
}

/// Append text with HTML whitespace collapsing.
fn push_text(target: &mut TextBlock, text: &str, marks: &MarkSet) {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if is_whitespace(c) {
            in_space = true;
            continue;
        }
        if in_space {
            collapsed.push(' ');
            in_space = false;
        }
        collapsed.push(c);
    }
    if in_space {
        collapsed.push(' ');
    }

    let strip_leading = match target.inlines.last() {
        None => true,
        Some(Inline::Text(prev)) => prev.text.ends_with(' '),
        Some(_) => false,
    };
    let collapsed = if strip_leading {
        collapsed.trim_start_matches(' ')
    } else {
        collapsed.as_str()
    };
    if !collapsed.is_empty() {
        target
            .inlines
            .push(Inline::Text(TextRun::new(collapsed, marks.clone())));
    }
}

fn trim_trailing_space(block: &mut TextBlock) {
    if let Some(Inline::Text(run)) = block.inlines.last_mut() {
        let trimmed = run.text.trim_end_matches(is_whitespace).len();
        run.text.truncate(trimmed);
    }
}
