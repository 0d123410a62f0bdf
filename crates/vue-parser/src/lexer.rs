//! Markup lexer using logos.
//!
//! Only the structural pieces of markup are tokenized: angle brackets, tag
//! and attribute names, `=` and quotes. Text content, attribute values and
//! comment bodies are sliced from the source by the parsers, which then skip
//! the tokens they covered.

use logos::Logos;
use source_map::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token kinds for Vue markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    /// `<!--`
    #[token("<!--", priority = 12)]
    CommentOpen,

    /// `</`
    #[token("</", priority = 11)]
    LAngleSlash,

    /// `<`
    #[token("<", priority = 10)]
    LAngle,

    /// `>`
    #[token(">", priority = 10)]
    RAngle,

    /// `/>`
    #[token("/>", priority = 11)]
    SlashRAngle,

    /// `/`
    #[token("/", priority = 10)]
    Slash,

    /// `=`
    #[token("=", priority = 10)]
    Eq,

    /// `"`
    #[token("\"", priority = 10)]
    DoubleQuote,

    /// `'`
    #[token("'", priority = 10)]
    SingleQuote,

    /// A tag or attribute name, including Vue directive syntax such as
    /// `:title`, `@click.prevent`, `v-bind:[key]` and `#default`.
    #[regex(r"[A-Za-z_:@#$\[][A-Za-z0-9_:@#$.\-\[\]]*", priority = 4)]
    Name,

    /// Any other run of non-structural characters.
    #[regex(r#"[^<>="'/ \t\r\n\f]+"#, priority = 1)]
    Text,

    /// End of file
    Eof,

    /// Invalid/unknown token
    #[default]
    Error,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::CommentOpen => "'<!--'",
            TokenKind::LAngleSlash => "'</'",
            TokenKind::LAngle => "'<'",
            TokenKind::RAngle => "'>'",
            TokenKind::SlashRAngle => "'/>'",
            TokenKind::Slash => "'/'",
            TokenKind::Eq => "'='",
            TokenKind::DoubleQuote => "'\"'",
            TokenKind::SingleQuote => "'''",
            TokenKind::Name => "name",
            TokenKind::Text => "text",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// A lexer over Vue markup. Always yields a trailing `Eof` token.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let kind = match self.inner.next() {
            Some(Ok(kind)) => kind,
            Some(Err(())) => TokenKind::Error,
            None => {
                self.finished = true;
                let end = self.source.len();
                return Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::from_usize(end, end),
                });
            }
        };
        let range = self.inner.span();
        Some(Token {
            kind,
            span: Span::from_usize(range.start, range.end),
        })
    }
}
