//! Snapshot tests for the HTML codec.

use insta::assert_snapshot;

use super::{parse_html, to_html};
use crate::config::{Capabilities, EditorConfig, HighlightOptions, ImageOptions};
use crate::error::ParseErrorKind;
use crate::model::{Block, Document, Inline, MarkKind, MarkSet, TextBlock, TextRun};

/// Parse then serialize with the given config.
fn render_with(config: &EditorConfig, html: &str) -> String {
    let doc = parse_html(html, config).expect("parse failed");
    to_html(&doc, config)
}

fn render(html: &str) -> String {
    render_with(&EditorConfig::default(), html)
}

#[test]
fn test_empty_document() {
    assert_snapshot!(to_html(&Document::empty(), &EditorConfig::default()), @"<p></p>");
    assert_snapshot!(render(""), @"<p></p>");
    assert_snapshot!(render("  \n "), @"<p></p>");
}

#[test]
fn test_plain_and_bold() {
    assert_snapshot!(
        render("<p>Hello <strong>world</strong></p>"),
        @"<p>Hello <strong>world</strong></p>"
    );
    assert_snapshot!(render("plain text"), @"<p>plain text</p>");
}

#[test]
fn test_mark_nesting_is_canonical() {
    assert_snapshot!(
        render("<p><em><b>x</b></em><i>y</i></p>"),
        @"<p><strong><em>x</em></strong><em>y</em></p>"
    );
    assert_snapshot!(
        render("<p><u>a</u><del>b</del><code>c</code></p>"),
        @"<p><u>a</u><s>b</s><code>c</code></p>"
    );
}

#[test]
fn test_link_attributes() {
    let doc = Document::from_blocks(vec![
        TextBlock::paragraph(vec![
            Inline::Text(TextRun::new(
                "site",
                MarkSet::default().with_link("https://example.com"),
            )),
            Inline::Text(TextRun::plain(" after")),
        ])
        .into(),
    ]);
    assert_snapshot!(
        to_html(&doc, &EditorConfig::default()),
        @r#"<p><a target="_blank" rel="noopener noreferrer nofollow" class="text-blue-600 underline cursor-pointer" href="https://example.com">site</a> after</p>"#
    );
}

#[test]
fn test_link_shares_outer_tag_with_inner_marks() {
    let mut config = EditorConfig::default();
    config.link.class = None;
    config.link.rel = None;
    config.link.target = None;
    assert_snapshot!(
        render_with(&config, r#"<p><a href="/u">a<strong>b</strong></a>c</p>"#),
        @r#"<p><a href="/u">a<strong>b</strong></a>c</p>"#
    );
}

#[test]
fn test_lists_wrap_paragraphs() {
    assert_snapshot!(
        render("<ul>\n  <li>one</li>\n  <li><p>two</p></li>\n</ul>"),
        @"<ul><li><p>one</p></li><li><p>two</p></li></ul>"
    );
    assert_snapshot!(
        render("<blockquote><p>q</p></blockquote><ol><li><p>1</p></li><li></li></ol>"),
        @"<blockquote><p>q</p></blockquote><ol><li><p>1</p></li><li><p></p></li></ol>"
    );
}

#[test]
fn test_nested_lists_flatten() {
    assert_snapshot!(
        render("<ul><li><p>a</p><ul><li><p>b</p></li></ul></li></ul>"),
        @"<ul><li><p>a</p></li><li><p>b</p></li></ul>"
    );
}

#[test]
fn test_alignment() {
    assert_snapshot!(
        render(r#"<h2 style="text-align: center">Title</h2><p style="TEXT-ALIGN:right">x</p><p style="text-align: left">y</p>"#),
        @r#"<h2 style="text-align: center">Title</h2><p style="text-align: right">x</p><p>y</p>"#
    );
}

#[test]
fn test_color_and_highlight() {
    assert_snapshot!(
        render(r##"<p><mark data-color="#ffc078">a</mark><span style="color: #FF0000">b</span><mark>c</mark></p>"##),
        @r##"<p><mark data-color="#ffc078" style="background-color: #ffc078; color: inherit">a</mark><span style="color: #FF0000">b</span><mark>c</mark></p>"##
    );
}

#[test]
fn test_single_color_highlight() {
    let config = EditorConfig {
        highlight: HighlightOptions { multicolor: false },
        ..EditorConfig::default()
    };
    assert_snapshot!(
        render_with(&config, r##"<p><mark data-color="#f00">x</mark></p>"##),
        @"<p><mark>x</mark></p>"
    );
}

#[test]
fn test_video_embed() {
    assert_snapshot!(
        render(r#"<div data-youtube-video><iframe src="https://www.youtube.com/embed/abc123"></iframe></div>"#),
        @r#"<div data-youtube-video=""><iframe width="640" height="360" allowfullscreen="true" src="https://www.youtube.com/embed/abc123"></iframe></div>"#
    );
    assert_snapshot!(
        render(r#"<p>before</p><iframe width="320" height="180" src="https://youtu.be/abc123"></iframe>"#),
        @r#"<p>before</p><div data-youtube-video=""><iframe width="320" height="180" allowfullscreen="true" src="https://www.youtube.com/embed/abc123"></iframe></div>"#
    );
}

#[test]
fn test_images_and_breaks() {
    assert_snapshot!(
        render(r#"<p>a<br>b<img src="x.png" alt="A"></p>"#),
        @r#"<p>a<br>b<img src="x.png" alt="A"></p>"#
    );
}

#[test]
fn test_escaping() {
    assert_snapshot!(
        render(r#"<p>1 &lt; 2 &amp;&amp; "q"</p>"#),
        @r#"<p>1 &lt; 2 &amp;&amp; "q"</p>"#
    );
    assert_snapshot!(
        render(r#"<p><img src="a.png?x=1&amp;y=&quot;2&quot;"></p>"#),
        @r#"<p><img src="a.png?x=1&amp;y=&quot;2&quot;"></p>"#
    );
}

#[test]
fn test_whitespace_collapses() {
    assert_snapshot!(render("<p>  a \n\t b  </p>"), @"<p>a b</p>");
    assert_snapshot!(render("<p>a <em> b</em></p>"), @"<p>a <em>b</em></p>");
}

#[test]
fn test_unknown_markup_unwrapped() {
    assert_snapshot!(
        render("<section><h4>Sub</h4><table><tr><td>cell</td></tr></table></section><script>x()</script>"),
        @"<p>Sub</p><p>cell</p>"
    );
    assert_snapshot!(
        render(r#"<p><span class="x" data-foo="1">kept</span></p>"#),
        @"<p>kept</p>"
    );
}

#[test]
fn test_disabled_capabilities_unwrap() {
    let config = EditorConfig {
        capabilities: Capabilities {
            bold: false,
            headings: false,
            bullet_list: false,
            video: false,
            ..Capabilities::all()
        },
        ..EditorConfig::default()
    };
    assert_snapshot!(
        render_with(&config, "<h1>T</h1><p><strong>x</strong><em>y</em></p><ul><li>i</li></ul>"),
        @"<p>T</p><p>x<em>y</em></p><p>i</p>"
    );
    assert_snapshot!(
        render_with(&config, r#"<div data-youtube-video=""><iframe src="v"></iframe></div>"#),
        @"<p></p>"
    );
}

#[test]
fn test_base64_images_refused() {
    let config = EditorConfig {
        image: ImageOptions {
            allow_base64: false,
        },
        ..EditorConfig::default()
    };
    assert_snapshot!(
        render_with(&config, r#"<p><img src="data:image/png;base64,AA">x</p>"#),
        @"<p>x</p>"
    );
}

#[test]
fn test_parse_errors() {
    let config = EditorConfig::default();
    let err = parse_html(r#"<p class="x>"#, &config).expect_err("unterminated quote");
    assert_eq!(err.kind(), &ParseErrorKind::UnterminatedAttribute);
    assert_eq!(err.offset(), 0);

    let err = parse_html("<p>ok</p><strong", &config).expect_err("unterminated tag");
    assert_eq!(err.kind(), &ParseErrorKind::UnterminatedTag);
    assert_eq!(err.offset(), 9);
}

#[test]
fn test_parsed_structure() {
    let doc = parse_html(
        "<p>a<strong>b</strong></p><p></p>",
        &EditorConfig::default(),
    )
    .expect("parses");
    assert_eq!(doc.blocks().len(), 2);
    let Block::Text(first) = &doc.blocks()[0] else {
        panic!("expected text block");
    };
    assert_eq!(
        first.inlines,
        vec![
            Inline::Text(TextRun::plain("a")),
            Inline::Text(TextRun::new("b", MarkSet::default().with(MarkKind::Bold))),
        ]
    );
    assert!(doc.blocks()[1].is_empty());
}

#[test]
fn test_long_comment_runs() {
    let mut html = "<!---->".repeat(200_000);
    html.push_str("<p>x</p>");
    html.push_str(&"<!doctype html>".repeat(50_000));
    assert_eq!(render(&html), "<p>x</p>");
}

#[test]
fn test_many_ampersands() {
    let html = format!("<p>{}&amp;</p>", "&".repeat(100_000));
    let doc = parse_html(&html, &EditorConfig::default()).expect("parses");
    assert_eq!(doc.text_content().len(), 100_001);
    assert!(doc.text_content().chars().all(|c| c == '&'));
}
