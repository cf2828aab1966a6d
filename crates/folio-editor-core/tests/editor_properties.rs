//! End-to-end behaviour of the editor, its history and the content bridge.

use std::cell::RefCell;
use std::rc::Rc;

use folio_editor_core::{
    BlockType, ContentBridge, DocumentChanged, Editor, EditorCommand, EditorConfig,
    EditorDocument, HeadingLevel, MarkKind, Selection, SyncOutcome, TextAlign, parse_html, to_html,
};
use insta::assert_snapshot;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn mounted(content: &str) -> Editor<Vec<DocumentChanged>> {
    init_logging();
    let mut editor = Editor::new(EditorConfig::default(), content, Vec::new());
    editor.mount();
    editor
}

fn select(editor: &mut Editor<Vec<DocumentChanged>>, anchor: usize, head: usize) {
    editor.execute(&EditorCommand::SetSelection(Selection::new(anchor, head)));
}

#[test]
fn canonical_content_round_trips() {
    let config = EditorConfig::default();
    let samples = [
        "<p></p>",
        "<h1>Program overview</h1><p>Study <strong>abroad</strong> in <em>Lisbon</em>.</p>",
        r#"<h3 style="text-align: right">Fees</h3><ol><li><p>Tuition</p></li><li><p>Housing<br>and meals</p></li></ol>"#,
        "<blockquote><p><u>under</u><s>struck</s><code>x = 1</code></p></blockquote>",
        r##"<p><span style="color: #800080">purple</span> and <mark data-color="#ffc078" style="background-color: #ffc078; color: inherit">marked</mark></p>"##,
        r#"<p><a target="_blank" rel="noopener noreferrer nofollow" class="text-blue-600 underline cursor-pointer" href="https://example.com/apply">Apply</a> today</p>"#,
        r#"<p>Campus <img src="https://cdn.example.com/campus.jpg" alt="Campus"></p>"#,
        r#"<div data-youtube-video=""><iframe width="640" height="360" allowfullscreen="true" src="https://www.youtube.com/embed/abc123"></iframe></div>"#,
    ];
    for html in samples {
        let doc = parse_html(html, &config).expect("canonical markup parses");
        assert_eq!(to_html(&doc, &config), html);
    }
}

#[test]
fn toggling_a_mark_twice_restores_the_document() {
    let content = "<p>Hello <strong>bold</strong> world</p><h2>Next</h2>";
    for kind in MarkKind::ALL {
        let mut editor = mounted(content);
        select(&mut editor, 0, 5);
        editor.execute(&EditorCommand::ToggleMark(kind));
        assert_ne!(editor.html(), Some(content), "{kind:?}");
        editor.execute(&EditorCommand::ToggleMark(kind));
        assert_eq!(editor.html(), Some(content), "{kind:?}");
    }
}

#[test]
fn toggling_a_fully_marked_selection_twice_restores_it() {
    let mut editor = mounted("<p><strong>all bold</strong></p>");
    select(&mut editor, 0, 8);
    editor.execute(&EditorCommand::ToggleMark(MarkKind::Bold));
    assert_eq!(editor.html(), Some("<p>all bold</p>"));
    editor.execute(&EditorCommand::ToggleMark(MarkKind::Bold));
    assert_eq!(editor.html(), Some("<p><strong>all bold</strong></p>"));
}

#[test]
fn rerendering_with_emitted_value_keeps_history() {
    init_logging();
    let host = Rc::new(RefCell::new(String::from("<p>Draft</p>")));
    let setter = {
        let host = Rc::clone(&host);
        move |html: &str| *host.borrow_mut() = html.to_owned()
    };
    let mut editor = Editor::new(EditorConfig::default(), host.borrow().clone(), ContentBridge::new(setter));
    editor.mount();

    editor.execute(&EditorCommand::SetSelection(Selection::collapsed(5)));
    editor.execute(&EditorCommand::InsertText(" two".into()));
    assert_eq!(host.borrow().as_str(), "<p>Draft two</p>");

    let current = host.borrow().clone();
    assert_eq!(editor.sync_content(&current), SyncOutcome::Echo);
    assert!(editor.can_undo());
    assert_eq!(
        editor.state().map(EditorDocument::selection),
        Some(Selection::collapsed(9))
    );

    // External and serialized content agree until the next mutation.
    assert_eq!(editor.html(), Some(current.as_str()));
}

#[test]
fn link_with_text_replaces_selection() {
    let mut editor = mounted("<p>Hello</p>");
    select(&mut editor, 0, 5);
    editor.execute(&EditorCommand::InsertLink {
        href: "https://example.com".into(),
        text: Some("Click".into()),
    });
    assert_snapshot!(
        editor.html().unwrap_or_default(),
        @r#"<p><a target="_blank" rel="noopener noreferrer nofollow" class="text-blue-600 underline cursor-pointer" href="https://example.com">Click</a></p>"#
    );
}

#[test]
fn link_without_text_links_selection() {
    let mut editor = mounted("<p>Hello</p>");
    select(&mut editor, 0, 5);
    editor.execute(&EditorCommand::InsertLink {
        href: "https://example.com".into(),
        text: None,
    });
    assert_snapshot!(
        editor.html().unwrap_or_default(),
        @r#"<p><a target="_blank" rel="noopener noreferrer nofollow" class="text-blue-600 underline cursor-pointer" href="https://example.com">Hello</a></p>"#
    );
}

#[test]
fn can_undo_tracks_mutations() {
    let mut editor = mounted("<p>Body</p>");
    assert!(!editor.can_undo());

    let edits = [
        EditorCommand::SelectAll,
        EditorCommand::ToggleMark(MarkKind::Italic),
        EditorCommand::SetBlock(BlockType::Heading(HeadingLevel::H1)),
        EditorCommand::SetAlignment(TextAlign::Justify),
    ];
    for command in &edits {
        editor.execute(command);
    }
    assert!(editor.can_undo());
    assert_eq!(editor.undo_depth(), 3);

    for _ in 0..3 {
        assert!(editor.undo());
    }
    assert!(!editor.can_undo());
    assert!(editor.can_redo());
    assert_eq!(editor.html(), Some("<p>Body</p>"));
}

#[test]
fn commands_before_ready_change_nothing() {
    let mut editor = Editor::new(EditorConfig::default(), "<p>Body</p>", Vec::new());
    let commands = [
        EditorCommand::ToggleMark(MarkKind::Bold),
        EditorCommand::InsertText("x".into()),
        EditorCommand::InsertImage { src: "a.png".into() },
        EditorCommand::Undo,
    ];
    for command in &commands {
        assert!(!editor.execute(command));
    }
    assert!(editor.sink().is_empty());
    assert!(!editor.can_undo());

    editor.mount();
    assert_eq!(editor.html(), Some("<p>Body</p>"));
    assert!(editor.sink().is_empty());
}

#[test]
fn typing_session() {
    let mut editor = mounted("");
    let session = [
        EditorCommand::ToggleBlock(BlockType::Heading(HeadingLevel::H1)),
        EditorCommand::InsertText("Semester in Kyoto".into()),
        EditorCommand::SplitBlock,
        EditorCommand::InsertText("Highlights:".into()),
        EditorCommand::SplitBlock,
        EditorCommand::ToggleBlock(BlockType::BulletList),
        EditorCommand::InsertText("Temples".into()),
        EditorCommand::SplitBlock,
        EditorCommand::InsertText("Language".into()),
        EditorCommand::SplitBlock,
        EditorCommand::SplitBlock,
        EditorCommand::ToggleMark(MarkKind::Bold),
        EditorCommand::InsertText("Apply now".into()),
    ];
    for command in &session {
        editor.execute(command);
    }
    assert_snapshot!(
        editor.html().unwrap_or_default(),
        @"<h1>Semester in Kyoto</h1><p>Highlights:</p><ul><li><p>Temples</p></li><li><p>Language</p></li></ul><p><strong>Apply now</strong></p>"
    );
}
