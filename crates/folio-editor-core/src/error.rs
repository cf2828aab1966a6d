//! Error types for the editor core.

use std::ops::Range;

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Markup that could not be turned into a document.
///
/// Only structural failures land here. Unknown elements and attributes are
/// dropped silently and never produce an error.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("parse error: {}", self.kind)]
#[diagnostic(code(folio::parse))]
pub struct ParseError {
    #[diagnostic_source]
    kind: ParseErrorKind,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    err_location: SourceSpan,
    #[help]
    advice: Option<String>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, source: &str, location: Range<usize>) -> Self {
        let start = location.start.min(source.len());
        let len = location.end.min(source.len()).saturating_sub(start);
        let advice = kind.advice();
        Self {
            kind,
            src: NamedSource::new("content", source.to_string()),
            err_location: (start, len).into(),
            advice,
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Byte offset of the error in the markup.
    pub fn offset(&self) -> usize {
        self.err_location.offset()
    }
}

#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("tag is never closed with '>'")]
    UnterminatedTag,

    #[error("attribute value is missing its closing quote")]
    UnterminatedAttribute,

    #[error("comment is never closed with '-->'")]
    UnterminatedComment,

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

impl ParseErrorKind {
    fn advice(&self) -> Option<String> {
        match self {
            ParseErrorKind::UnterminatedAttribute => {
                Some("quote characters inside values must be written as &quot;".to_string())
            }
            ParseErrorKind::TooDeep(_) => {
                Some("flatten the markup before loading it into the editor".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_clamped() {
        let err = ParseError::new(ParseErrorKind::UnterminatedTag, "<p", 0..40);
        assert_eq!(err.offset(), 0);
        assert_eq!(err.kind(), &ParseErrorKind::UnterminatedTag);
        assert_eq!(err.to_string(), "parse error: tag is never closed with '>'");
    }
}
