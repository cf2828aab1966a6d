//! Element tree built from the token stream.
//!
//! Follows the handful of HTML recovery rules that matter for editor
//! content: void elements never take children, an open `<p>` closes when a
//! block starts, `<li>` closes a sibling `<li>`, and stray end tags are
//! ignored.

use super::entities::decode_entities;
use super::lexer::{Lexer, Token};
use crate::error::{ParseError, ParseErrorKind};

/// Maximum element nesting accepted from markup.
pub const MAX_DEPTH: usize = 256;

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const CLOSES_PARAGRAPH: &[&str] = &[
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
    "table",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn new(name: String, attrs: Vec<(String, String)>) -> Self {
        Self {
            name,
            attrs,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value.as_str()))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    /// Value of a CSS property in the inline `style` attribute.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.attr("style")?.split(';').find_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(property)
                .then(|| value.trim())
                .filter(|v| !v.is_empty())
        })
    }

    /// First descendant element named `name`, depth first.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| match child {
            Node::Element(el) if el.name == name => Some(el),
            Node::Element(el) => el.find(name),
            Node::Text(_) => None,
        })
    }
}

/// Parse `src` into a list of top-level nodes.
pub(crate) fn build(src: &str) -> Result<Vec<Node>, ParseError> {
    let mut stack: Vec<Element> = vec![Element::default()];

    let mut lexer = Lexer::new(src);
    loop {
        let token_start = lexer.offset();
        let Some(token) = lexer.next() else {
            break;
        };
        let token = token.map_err(|e| ParseError::new(e.kind, src, e.span))?;
        match token {
            Token::Text(text) => {
                let text = decode_entities(text);
                push_child(&mut stack, Node::Text(text.into_owned()));
            }
            Token::Start {
                name,
                attrs,
                self_closing,
            } => {
                if CLOSES_PARAGRAPH.contains(&name.as_str()) && top_is(&stack, "p") {
                    pop(&mut stack);
                }
                if name == "li" {
                    close_open_item(&mut stack);
                }
                let element = Element::new(name, attrs);
                if self_closing || VOID.contains(&element.name.as_str()) {
                    push_child(&mut stack, Node::Element(element));
                } else {
                    if stack.len() > MAX_DEPTH {
                        return Err(ParseError::new(
                            ParseErrorKind::TooDeep(MAX_DEPTH),
                            src,
                            token_start..lexer.offset(),
                        ));
                    }
                    stack.push(element);
                }
            }
            Token::End { name } => {
                if name == "br" {
                    // `</br>` is treated as `<br>`.
                    push_child(&mut stack, Node::Element(Element::new(name, Vec::new())));
                    continue;
                }
                if let Some(depth) = stack.iter().skip(1).rposition(|el| el.name == name) {
                    while stack.len() > depth + 1 {
                        pop(&mut stack);
                    }
                }
            }
        }
    }

    while stack.len() > 1 {
        pop(&mut stack);
    }
    Ok(stack.pop().map(|root| root.children).unwrap_or_default())
}

fn top_is(stack: &[Element], name: &str) -> bool {
    stack.len() > 1 && stack.last().is_some_and(|el| el.name == name)
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

/// Pop the top element into its parent.
fn pop(stack: &mut Vec<Element>) {
    if stack.len() <= 1 {
        return;
    }
    if let Some(done) = stack.pop() {
        push_child(stack, Node::Element(done));
    }
}

/// Close an open `<li>` in the current list before starting another.
fn close_open_item(stack: &mut Vec<Element>) {
    let list_depth = stack
        .iter()
        .rposition(|el| el.name == "ul" || el.name == "ol")
        .unwrap_or(0);
    let Some(item) = stack.iter().rposition(|el| el.name == "li") else {
        return;
    };
    if item > list_depth {
        while stack.len() > item {
            pop(stack);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(node: &Node) -> &Element {
        match node {
            Node::Element(el) => el,
            Node::Text(text) => panic!("expected element, got text {text:?}"),
        }
    }

    #[test]
    fn test_nesting() {
        let nodes = build("<p>a<strong>b</strong></p>").expect("parses");
        let p = element(&nodes[0]);
        assert_eq!(p.name, "p");
        assert_eq!(p.children.len(), 2);
        assert_eq!(element(&p.children[1]).name, "strong");
    }

    #[test]
    fn test_paragraph_closed_by_block() {
        let nodes = build("<p>one<ul><li>two</ul>").expect("parses");
        assert_eq!(nodes.len(), 2);
        assert_eq!(element(&nodes[1]).name, "ul");
    }

    #[test]
    fn test_list_items_close_siblings() {
        let nodes = build("<ul><li>a<li>b</ul>").expect("parses");
        let ul = element(&nodes[0]);
        assert_eq!(ul.children.len(), 2);
    }

    #[test]
    fn test_stray_end_tags_ignored() {
        let nodes = build("</div>text</em>").expect("parses");
        assert_eq!(nodes, vec![Node::Text("text".into())]);
    }

    #[test]
    fn test_style_lookup() {
        let nodes = build(r#"<mark style="background-color: red; COLOR : inherit">x</mark>"#)
            .expect("parses");
        let mark = element(&nodes[0]);
        assert_eq!(mark.style("color"), Some("inherit"));
        assert_eq!(mark.style("background-color"), Some("red"));
        assert_eq!(mark.style("text-align"), None);
    }

    #[test]
    fn test_depth_limit() {
        let deep = "<span>".repeat(MAX_DEPTH + 1);
        let err = build(&deep).expect_err("too deep");
        assert_eq!(err.kind(), &ParseErrorKind::TooDeep(MAX_DEPTH));
    }
}
