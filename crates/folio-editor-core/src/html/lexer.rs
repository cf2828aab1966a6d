//! Tolerant tokenizer for HTML fragments.
//!
//! Produces start tags, end tags and raw text. Comments, doctypes and
//! processing instructions are skipped. Attribute values are entity-decoded;
//! text is left raw for the tree builder.

use std::ops::Range;

use super::entities::decode_entities;
use crate::error::ParseErrorKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
    Text(&'a str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LexError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
}

pub(crate) struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes().get(self.pos + ahead).copied()
    }

    fn error(&self, kind: ParseErrorKind, start: usize) -> LexError {
        LexError {
            kind,
            span: start..self.src.len(),
        }
    }

    fn skip_space(&mut self) {
        while self.peek(0).is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// Text up to the next `<` at or after `from`.
    fn text_from(&mut self, start: usize, from: usize) -> Token<'a> {
        let end = self.src[from..]
            .find('<')
            .map(|i| from + i)
            .unwrap_or(self.src.len());
        self.pos = end;
        Token::Text(&self.src[start..end])
    }

    fn skip_until(&mut self, start: usize, needle: &str, kind: ParseErrorKind) -> Result<(), LexError> {
        match self.src[self.pos..].find(needle) {
            Some(i) => {
                self.pos += i + needle.len();
                Ok(())
            }
            None => Err(self.error(kind, start)),
        }
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b':')
        {
            self.pos += 1;
        }
        self.src[start..self.pos].to_ascii_lowercase()
    }

    fn end_tag(&mut self, start: usize) -> Result<Token<'a>, LexError> {
        self.pos += 2;
        let name = self.read_name();
        self.skip_until(start, ">", ParseErrorKind::UnterminatedTag)?;
        Ok(Token::End { name })
    }

    fn start_tag(&mut self, start: usize) -> Result<Token<'a>, LexError> {
        self.pos += 1;
        let name = self.read_name();
        let mut attrs = Vec::new();
        loop {
            self.skip_space();
            match self.peek(0) {
                None => return Err(self.error(ParseErrorKind::UnterminatedTag, start)),
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(Token::Start {
                        name,
                        attrs,
                        self_closing: false,
                    });
                }
                Some(b'/') if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok(Token::Start {
                        name,
                        attrs,
                        self_closing: true,
                    });
                }
                Some(b'/') => self.pos += 1,
                Some(_) => {
                    if let Some(attr) = self.attribute(start)? {
                        attrs.push(attr);
                    }
                }
            }
        }
    }

    fn attribute(&mut self, tag_start: usize) -> Result<Option<(String, String)>, LexError> {
        let name_start = self.pos;
        while self
            .peek(0)
            .is_some_and(|b| !is_space(b) && !matches!(b, b'=' | b'>' | b'/'))
        {
            self.pos += 1;
        }
        if self.pos == name_start {
            // Stray '=' with no name.
            self.pos += 1;
            return Ok(None);
        }
        let name = self.src[name_start..self.pos].to_ascii_lowercase();

        self.skip_space();
        if self.peek(0) != Some(b'=') {
            return Ok(Some((name, String::new())));
        }
        self.pos += 1;
        self.skip_space();

        let value = match self.peek(0) {
            Some(quote @ (b'"' | b'\'')) => {
                let value_start = self.pos + 1;
                let Some(len) = self.bytes()[value_start..].iter().position(|&b| b == quote)
                else {
                    return Err(self.error(ParseErrorKind::UnterminatedAttribute, tag_start));
                };
                self.pos = value_start + len + 1;
                &self.src[value_start..value_start + len]
            }
            Some(_) => {
                let value_start = self.pos;
                while self.peek(0).is_some_and(|b| !is_space(b) && b != b'>') {
                    self.pos += 1;
                }
                &self.src[value_start..self.pos]
            }
            None => return Err(self.error(ParseErrorKind::UnterminatedTag, tag_start)),
        };
        Ok(Some((name, decode_entities(value).into_owned())))
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, LexError> {
        loop {
            let start = self.pos;
            let Some(b) = self.peek(0) else {
                return Ok(None);
            };
            if b != b'<' {
                return Ok(Some(self.text_from(start, start)));
            }

            if self.src[start..].starts_with("<!--") {
                self.pos += 4;
                self.skip_until(start, "-->", ParseErrorKind::UnterminatedComment)?;
                continue;
            }
            return match self.peek(1) {
                Some(b'!' | b'?') => {
                    self.skip_until(start, ">", ParseErrorKind::UnterminatedTag)?;
                    continue;
                }
                Some(b'/') if self.peek(2).is_some_and(|b| b.is_ascii_alphabetic()) => {
                    self.end_tag(start).map(Some)
                }
                Some(b) if b.is_ascii_alphabetic() => self.start_tag(start).map(Some),
                // A lone '<' is text.
                _ => Ok(Some(self.text_from(start, start + 1))),
            };
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
