//! Document to HTML.
//!
//! Output is canonical, so the same document always produces the same
//! bytes and stored content can be compared as strings:
//!
//! - empty paragraphs are written as `<p></p>`
//! - list items wrap their paragraph: `<ul><li><p>..</p></li></ul>`
//! - alignment other than left is an inline `text-align` style
//! - marks nest outermost-first: link, color, highlight, bold, italic,
//!   underline, strike, code

use markdown_weaver_escape::{StrWrite, escape_html, escape_html_body_text};

use crate::config::EditorConfig;
use crate::model::{
    Block, Container, Document, ImageNode, Inline, Mark, TextBlock, TextKind, VideoEmbed,
};
use crate::types::TextAlign;

pub(crate) struct HtmlWriter<'c, W> {
    config: &'c EditorConfig,
    writer: W,
    /// Wrapper currently open around consecutive blocks.
    open_container: Option<Container>,
    /// Marks currently open, outermost first.
    open_marks: Vec<Mark>,
}

impl<'c, W: StrWrite> HtmlWriter<'c, W> {
    pub fn new(config: &'c EditorConfig, writer: W) -> Self {
        Self {
            config,
            writer,
            open_container: None,
            open_marks: Vec::new(),
        }
    }

    #[inline]
    fn write(&mut self, s: &str) -> Result<(), W::Error> {
        self.writer.write_str(s)
    }

    pub fn run(mut self, doc: &Document) -> Result<(), W::Error> {
        for block in doc.blocks() {
            let container = match block {
                Block::Text(tb) => tb.container,
                Block::Video(_) => None,
            };
            if container != self.open_container {
                self.close_container()?;
                self.open_container(container)?;
            }
            match block {
                Block::Text(tb) => self.text_block(tb)?,
                Block::Video(video) => self.video(video)?,
            }
        }
        self.close_container()
    }

    fn open_container(&mut self, container: Option<Container>) -> Result<(), W::Error> {
        match container {
            Some(Container::BulletList) => self.write("<ul>")?,
            Some(Container::OrderedList) => self.write("<ol>")?,
            Some(Container::Blockquote) => self.write("<blockquote>")?,
            None => {}
        }
        self.open_container = container;
        Ok(())
    }

    fn close_container(&mut self) -> Result<(), W::Error> {
        match self.open_container.take() {
            Some(Container::BulletList) => self.write("</ul>"),
            Some(Container::OrderedList) => self.write("</ol>"),
            Some(Container::Blockquote) => self.write("</blockquote>"),
            None => Ok(()),
        }
    }

    fn text_block(&mut self, block: &TextBlock) -> Result<(), W::Error> {
        let in_list = matches!(
            block.container,
            Some(Container::BulletList | Container::OrderedList)
        );
        if in_list {
            self.write("<li>")?;
        }

        let tag = match block.kind {
            TextKind::Paragraph => "p",
            TextKind::Heading(level) => match level.get() {
                1 => "h1",
                2 => "h2",
                _ => "h3",
            },
        };
        self.write("<")?;
        self.write(tag)?;
        if block.align != TextAlign::Left {
            self.write(" style=\"text-align: ")?;
            self.write(block.align.as_css())?;
            self.write("\"")?;
        }
        self.write(">")?;

        for inline in &block.inlines {
            self.inline(inline)?;
        }
        self.sync_marks(&[])?;

        self.write("</")?;
        self.write(tag)?;
        self.write(">")?;
        if in_list {
            self.write("</li>")?;
        }
        Ok(())
    }

    fn inline(&mut self, inline: &Inline) -> Result<(), W::Error> {
        match inline {
            Inline::Text(run) => {
                self.sync_marks(&run.marks.ordered())?;
                escape_html_body_text(&mut self.writer, &run.text)
            }
            Inline::Image(image) => {
                self.sync_marks(&[])?;
                self.image(image)
            }
            Inline::HardBreak => {
                self.sync_marks(&[])?;
                self.write("<br>")
            }
        }
    }

    /// Close and open marks so exactly `marks` are open.
    fn sync_marks(&mut self, marks: &[Mark]) -> Result<(), W::Error> {
        let common = self
            .open_marks
            .iter()
            .zip(marks)
            .take_while(|(open, wanted)| open == wanted)
            .count();
        while self.open_marks.len() > common {
            if let Some(mark) = self.open_marks.pop() {
                self.close_mark(&mark)?;
            }
        }
        for mark in &marks[common..] {
            self.open_mark(mark)?;
            self.open_marks.push(mark.clone());
        }
        Ok(())
    }

    fn open_mark(&mut self, mark: &Mark) -> Result<(), W::Error> {
        match mark {
            Mark::Link(href) => {
                self.write("<a")?;
                let config = self.config;
                let link = &config.link;
                let attrs = [
                    ("target", &link.target),
                    ("rel", &link.rel),
                    ("class", &link.class),
                ];
                for (name, value) in attrs {
                    if let Some(value) = value {
                        self.write(" ")?;
                        self.write(name)?;
                        self.write("=\"")?;
                        escape_html(&mut self.writer, value)?;
                        self.write("\"")?;
                    }
                }
                self.write(" href=\"")?;
                escape_html(&mut self.writer, href)?;
                self.write("\">")
            }
            Mark::Color(color) => {
                self.write("<span style=\"color: ")?;
                escape_html(&mut self.writer, color)?;
                self.write("\">")
            }
            Mark::Highlight(None) => self.write("<mark>"),
            Mark::Highlight(Some(color)) => {
                self.write("<mark data-color=\"")?;
                escape_html(&mut self.writer, color)?;
                self.write("\" style=\"background-color: ")?;
                escape_html(&mut self.writer, color)?;
                self.write("; color: inherit\">")
            }
            Mark::Bold => self.write("<strong>"),
            Mark::Italic => self.write("<em>"),
            Mark::Underline => self.write("<u>"),
            Mark::Strike => self.write("<s>"),
            Mark::Code => self.write("<code>"),
        }
    }

    fn close_mark(&mut self, mark: &Mark) -> Result<(), W::Error> {
        self.write(match mark {
            Mark::Link(_) => "</a>",
            Mark::Color(_) => "</span>",
            Mark::Highlight(_) => "</mark>",
            Mark::Bold => "</strong>",
            Mark::Italic => "</em>",
            Mark::Underline => "</u>",
            Mark::Strike => "</s>",
            Mark::Code => "</code>",
        })
    }

    fn image(&mut self, image: &ImageNode) -> Result<(), W::Error> {
        self.write("<img src=\"")?;
        escape_html(&mut self.writer, &image.src)?;
        self.write("\"")?;
        if let Some(alt) = &image.alt {
            self.write(" alt=\"")?;
            escape_html(&mut self.writer, alt)?;
            self.write("\"")?;
        }
        if let Some(title) = &image.title {
            self.write(" title=\"")?;
            escape_html(&mut self.writer, title)?;
            self.write("\"")?;
        }
        self.write(">")
    }

    fn video(&mut self, video: &VideoEmbed) -> Result<(), W::Error> {
        self.write("<div data-youtube-video=\"\"><iframe width=\"")?;
        self.write(&video.width.to_string())?;
        self.write("\" height=\"")?;
        self.write(&video.height.to_string())?;
        self.write("\" allowfullscreen=\"true\" src=\"")?;
        escape_html(&mut self.writer, &video.src)?;
        self.write("\"></iframe></div>")
    }
}
