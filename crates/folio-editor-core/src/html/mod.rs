//! HTML codec for documents.
//!
//! [`parse_html`] accepts arbitrary fragments and keeps what the schema can
//! represent. [`to_html`] writes canonical markup that [`parse_html`] reads
//! back to the same document.

mod entities;
mod lexer;
mod parse;
mod tree;
mod writer;

#[cfg(test)]
mod tests;

pub use tree::MAX_DEPTH;

use markdown_weaver_escape::{FmtWriter, StrWrite};

use crate::config::EditorConfig;
use crate::error::ParseError;
use crate::model::Document;

/// Parse an HTML fragment into a document.
///
/// Empty or whitespace-only input yields a single empty paragraph.
pub fn parse_html(src: &str, config: &EditorConfig) -> Result<Document, ParseError> {
    let nodes = tree::build(src)?;
    let mut builder = parse::DocumentBuilder::new(config);
    builder.blocks(&nodes, None);
    let doc = builder.finish();
    tracing::trace!(
        target: "folio::html",
        blocks = doc.blocks().len(),
        bytes = src.len(),
        "parsed content"
    );
    Ok(doc)
}

/// Write `doc` as HTML into any [`StrWrite`] sink.
pub fn write_html<W: StrWrite>(
    doc: &Document,
    config: &EditorConfig,
    writer: W,
) -> Result<(), W::Error> {
    writer::HtmlWriter::new(config, writer).run(doc)
}

/// Serialize `doc` to an HTML string.
pub fn to_html(doc: &Document, config: &EditorConfig) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_html(doc, config, FmtWriter(&mut out));
    out
}
