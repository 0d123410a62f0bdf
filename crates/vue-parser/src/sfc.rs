//! Splits a single-file component into its top-level blocks.

use crate::cursor::{Cursor, TagEnd};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::TokenKind;
use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::Span;

/// A top-level block such as `<template>` or `<script lang="ts">`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SfcBlock {
    /// Raw text between the start and end tags.
    pub content: String,
    /// Location of `content` in the component source.
    pub content_span: Span,
    pub attrs: IndexMap<SmolStr, String>,
    /// Location of the whole block, tags included.
    pub span: Span,
}

impl SfcBlock {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The `lang` attribute, if present and non-empty.
    pub fn lang(&self) -> Option<&str> {
        self.attr("lang").filter(|lang| !lang.is_empty())
    }
}

/// A `<style>` block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SfcStyleBlock {
    pub block: SfcBlock,
    pub scoped: bool,
}

/// The blocks of a component, in the shape the converter consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SfcDescriptor {
    pub template: Option<SfcBlock>,
    pub script: Option<SfcBlock>,
    pub styles: Vec<SfcStyleBlock>,
}

/// The result of splitting a component.
#[derive(Debug)]
pub struct SfcParseResult {
    pub descriptor: SfcDescriptor,
    pub errors: Vec<ParseError>,
}

pub(crate) struct SfcParser<'src> {
    cursor: Cursor<'src>,
    descriptor: SfcDescriptor,
}

impl<'src> SfcParser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            descriptor: SfcDescriptor::default(),
        }
    }

    pub fn parse(mut self) -> SfcParseResult {
        loop {
            match self.cursor.current_kind() {
                TokenKind::Eof => break,
                TokenKind::CommentOpen => {
                    self.cursor.skip_comment();
                }
                TokenKind::LAngle => self.parse_block(),
                _ => self.cursor.advance(),
            }
        }
        SfcParseResult {
            descriptor: self.descriptor,
            errors: self.cursor.errors,
        }
    }

    fn parse_block(&mut self) {
        let start = self.cursor.current().span.start;
        self.cursor.advance();
        if !self.cursor.check(TokenKind::Name) {
            return;
        }
        let tag = self.cursor.current_text();
        self.cursor.advance();

        let start_tag = self.cursor.parse_start_tag_rest();
        let content_start = self.cursor.prev_end();
        let content_end = match start_tag.end {
            TagEnd::SelfClosing => content_start,
            TagEnd::Open => match self.find_block_end(tag, content_start) {
                Some(close) => {
                    self.cursor.advance_to(close);
                    self.cursor.parse_closing_tag();
                    close
                }
                None => {
                    self.unclosed(tag, start);
                    return;
                }
            },
            TagEnd::Eof => {
                self.unclosed(tag, start);
                return;
            }
        };

        let block = SfcBlock {
            content: self.cursor.source[content_start..content_end].to_string(),
            content_span: Span::from_usize(content_start, content_end),
            attrs: start_tag.attrs,
            span: Span::from_usize(usize::from(start), self.cursor.prev_end()),
        };
        self.store(tag, block);
    }

    fn unclosed(&mut self, tag: &str, start: text_size::TextSize) {
        let span = Span::new(start, self.cursor.current().span.end);
        self.cursor.error(
            ParseErrorKind::UnclosedBlock {
                tag_name: tag.to_string(),
            },
            span,
        );
        self.cursor.advance_to(self.cursor.source.len());
    }

    fn store(&mut self, tag: &str, block: SfcBlock) {
        let slot = match tag {
            "template" => &mut self.descriptor.template,
            "script" => &mut self.descriptor.script,
            "style" => {
                let scoped = block.attrs.contains_key("scoped");
                self.descriptor.styles.push(SfcStyleBlock { block, scoped });
                return;
            }
            _ => {
                tracing::trace!(tag, "skipping custom block");
                return;
            }
        };

        if slot.is_some() {
            let span = block.span;
            self.cursor.error(
                ParseErrorKind::DuplicateBlock {
                    tag_name: tag.to_string(),
                },
                span,
            );
        } else {
            *slot = Some(block);
        }
    }

    /// Finds the `</tag` that closes a block whose content starts at `from`.
    ///
    /// `<template>` blocks may nest `<template>` elements, so those are
    /// matched by depth.
    fn find_block_end(&self, tag: &str, from: usize) -> Option<usize> {
        let rest = &self.cursor.source[from..];
        let close = format!("</{}", tag);
        if tag != "template" {
            return rest.find(&close).map(|i| from + i);
        }

        let mut depth = 0usize;
        let mut pos = 0;
        loop {
            let next_close = pos + rest[pos..].find(&close)?;
            match find_template_open(&rest[pos..]).map(|i| pos + i) {
                Some(open) if open < next_close => {
                    depth += 1;
                    pos = open + "<template".len();
                }
                _ if depth == 0 => return Some(from + next_close),
                _ => {
                    depth -= 1;
                    pos = next_close + close.len();
                }
            }
        }
    }
}

/// Offset of the next `<template` start tag in `text`.
fn find_template_open(text: &str) -> Option<usize> {
    text.match_indices("<template").map(|(i, _)| i).find(|&i| {
        text[i + "<template".len()..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == '>' || c == '/')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn split(source: &str) -> SfcDescriptor {
        let result = SfcParser::new(source).parse();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        result.descriptor
    }

    #[test]
    fn test_all_blocks() {
        let source = "<template>\n  <div/>\n</template>\n\n<script>\nexport default {}\n</script>\n<style scoped>\na { color: red }\n</style>\n";
        let descriptor = split(source);

        let template = descriptor.template.expect("template");
        assert_eq!(template.content, "\n  <div/>\n");
        assert_eq!(template.content_span.slice(source), Some("\n  <div/>\n"));

        let script = descriptor.script.expect("script");
        assert_eq!(script.content, "\nexport default {}\n");
        assert_eq!(script.lang(), None);

        assert_eq!(descriptor.styles.len(), 1);
        assert!(descriptor.styles[0].scoped);
    }

    #[test]
    fn test_nested_template_elements() {
        let source = "<template><div><template v-if=\"a\">x</template></div></template>";
        let descriptor = split(source);
        assert_eq!(
            descriptor.template.map(|t| t.content),
            Some("<div><template v-if=\"a\">x</template></div>".to_string())
        );
    }

    #[test]
    fn test_script_with_markup_inside() {
        let source = "<script lang=\"ts\">\nconst s = '<div>' < 3;\n</script>";
        let descriptor = split(source);
        let script = descriptor.script.expect("script");
        assert_eq!(script.lang(), Some("ts"));
        assert_eq!(script.content, "\nconst s = '<div>' < 3;\n");
    }

    #[test]
    fn test_custom_blocks_and_comments_skipped() {
        let source = "<!-- header --><docs>\n# Title\n</docs><template><p/></template>";
        let descriptor = split(source);
        assert!(descriptor.template.is_some());
        assert!(descriptor.script.is_none());
    }

    #[test]
    fn test_multiple_styles() {
        let descriptor = split("<style>a{}</style><style lang=\"scss\">b{}</style>");
        let langs: Vec<Option<&str>> = descriptor.styles.iter().map(|s| s.block.lang()).collect();
        assert_eq!(langs, vec![None, Some("scss")]);
    }

    #[test]
    fn test_duplicate_script() {
        let result = SfcParser::new("<script>a</script><script>b</script>").parse();
        assert_eq!(
            result.errors[0].kind,
            ParseErrorKind::DuplicateBlock {
                tag_name: "script".to_string()
            }
        );
        assert_eq!(
            result.descriptor.script.map(|s| s.content),
            Some("a".to_string())
        );
    }

    #[test]
    fn test_unclosed_block() {
        let result = SfcParser::new("<template><div></div>").parse();
        assert_eq!(
            result.errors[0].kind,
            ParseErrorKind::UnclosedBlock {
                tag_name: "template".to_string()
            }
        );
    }
}
