//! Token cursor shared by the component splitter and the template parser.

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::Span;

/// What follows the attributes of a start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagEnd {
    /// `>`
    Open,
    /// `/>`
    SelfClosing,
    /// Input ended inside the tag.
    Eof,
}

/// A start tag after its name: attributes and the way it ended.
#[derive(Debug)]
pub(crate) struct StartTag {
    pub attrs: IndexMap<SmolStr, String>,
    pub end: TagEnd,
}

pub(crate) struct Cursor<'src> {
    pub source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    eof_token: Token,
    pub errors: Vec<ParseError>,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        Self {
            source,
            tokens,
            pos: 0,
            eof_token: Token {
                kind: TokenKind::Eof,
                span: Span::from_usize(source.len(), source.len()),
            },
            errors: Vec::new(),
        }
    }

    // === Token helpers ===

    pub fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn current_text(&self) -> &'src str {
        self.current().span.slice(self.source).unwrap_or("")
    }

    /// Byte offset where the current token starts.
    pub fn offset(&self) -> usize {
        usize::from(self.current().span.start)
    }

    /// Byte offset where the previously consumed token ended.
    pub fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| usize::from(t.span.end))
    }

    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips every token that starts before `offset`.
    ///
    /// Parsers slice text straight from the source and call this to resync
    /// the token stream afterwards.
    pub fn advance_to(&mut self, offset: usize) {
        while self.offset() < offset && !self.check(TokenKind::Eof) {
            self.advance();
        }
    }

    pub fn error(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError::new(kind, span));
    }

    /// Reports an error at the current token.
    pub fn error_here(&mut self, kind: ParseErrorKind) {
        let span = self.current().span;
        self.error(kind, span);
    }

    // === Tags ===

    /// Parses attributes up to and including the closing `>` or `/>`.
    ///
    /// The cursor must sit just after the tag name.
    pub fn parse_start_tag_rest(&mut self) -> StartTag {
        let mut attrs = IndexMap::new();
        loop {
            match self.current_kind() {
                TokenKind::RAngle => {
                    self.advance();
                    return StartTag {
                        attrs,
                        end: TagEnd::Open,
                    };
                }
                TokenKind::SlashRAngle => {
                    self.advance();
                    return StartTag {
                        attrs,
                        end: TagEnd::SelfClosing,
                    };
                }
                TokenKind::Eof => {
                    return StartTag {
                        attrs,
                        end: TagEnd::Eof,
                    };
                }
                TokenKind::Name => self.parse_attribute(&mut attrs),
                found => {
                    self.error_here(ParseErrorKind::UnexpectedToken {
                        expected: "attribute or '>'",
                        found: found.name(),
                    });
                    self.advance();
                }
            }
        }
    }

    fn parse_attribute(&mut self, attrs: &mut IndexMap<SmolStr, String>) {
        let name_span = self.current().span;
        let name = SmolStr::new(self.current_text());
        self.advance();

        let value = if self.eat(TokenKind::Eq) {
            self.parse_attribute_value()
        } else {
            String::new()
        };

        if attrs.contains_key(&name) {
            self.error(
                ParseErrorKind::DuplicateAttribute {
                    name: name.to_string(),
                },
                name_span,
            );
        } else {
            attrs.insert(name, value);
        }
    }

    fn parse_attribute_value(&mut self) -> String {
        let quote = match self.current_kind() {
            TokenKind::DoubleQuote => '"',
            TokenKind::SingleQuote => '\'',
            _ => return self.parse_unquoted_value(),
        };

        let open = self.current().span;
        let start = usize::from(open.end);
        match self.source[start..].find(quote) {
            Some(len) => {
                self.advance_to(start + len + 1);
                self.source[start..start + len].to_string()
            }
            None => {
                self.error(ParseErrorKind::UnclosedAttributeValue, open);
                self.advance_to(self.source.len());
                self.source[start..].to_string()
            }
        }
    }

    fn parse_unquoted_value(&mut self) -> String {
        let start = self.offset();
        let rest = &self.source[start..];
        let len = rest
            .char_indices()
            .find(|&(i, c)| c.is_whitespace() || c == '>' || rest[i..].starts_with("/>"))
            .map_or(rest.len(), |(i, _)| i);
        self.advance_to(start + len);
        rest[..len].to_string()
    }

    /// Parses `</name>` and returns the name, or `None` if the cursor is not
    /// at a closing tag.
    pub fn parse_closing_tag(&mut self) -> Option<(&'src str, Span)> {
        let start = self.current().span.start;
        if !self.eat(TokenKind::LAngleSlash) {
            return None;
        }
        let name = if self.check(TokenKind::Name) {
            let name = self.current_text();
            self.advance();
            name
        } else {
            ""
        };
        let end = self.current().span.end;
        if !self.eat(TokenKind::RAngle) {
            let found = self.current_kind().name();
            self.error_here(ParseErrorKind::UnexpectedToken {
                expected: "'>'",
                found,
            });
        }
        Some((name, Span::new(start, end)))
    }

    /// Skips a comment starting at the current `<!--` token and returns its
    /// body and span.
    pub fn skip_comment(&mut self) -> (&'src str, Span) {
        let open = self.current().span;
        let body_start = usize::from(open.end);
        let (body_end, end) = match self.source[body_start..].find("-->") {
            Some(len) => (body_start + len, body_start + len + 3),
            None => {
                self.error(ParseErrorKind::UnclosedComment, open);
                (self.source.len(), self.source.len())
            }
        };
        self.advance_to(end);
        (
            &self.source[body_start..body_end],
            Span::from_usize(usize::from(open.start), end),
        )
    }
}
