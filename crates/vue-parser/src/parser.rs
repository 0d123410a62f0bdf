//! Recursive descent parser for Vue templates.

use crate::ast::*;
use crate::cursor::{Cursor, TagEnd};
use crate::directive::{parse_for, parse_text};
use crate::error::ParseErrorKind;
use crate::lexer::TokenKind;
use crate::{TemplateParseOptions, TemplateParseResult};
use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::Span;
use text_size::TextSize;

/// HTML void elements that never have a closing tag.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "frame", "hr", "img", "input", "isindex", "keygen",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Returns true if the given element name is an HTML void element.
pub fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Tags a template may not contain.
fn is_forbidden_tag(name: &str, attrs: &IndexMap<SmolStr, String>) -> bool {
    name.eq_ignore_ascii_case("style")
        || (name.eq_ignore_ascii_case("script")
            && attrs
                .get("type")
                .map_or(true, |ty| ty == "text/javascript"))
}

/// The template parser.
pub struct TemplateParser<'src> {
    cursor: Cursor<'src>,
    options: TemplateParseOptions,
}

impl<'src> TemplateParser<'src> {
    pub fn new(source: &'src str, options: TemplateParseOptions) -> Self {
        Self {
            cursor: Cursor::new(source),
            options,
        }
    }

    /// Parses the template and selects its root element.
    pub fn parse(mut self) -> TemplateParseResult {
        let nodes = self.parse_nodes(None);
        let nodes = self.chain_branches(nodes);
        let root = self.select_root(nodes);
        TemplateParseResult {
            root,
            errors: self.cursor.errors,
        }
    }

    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        self.cursor.error(kind, span);
    }

    /// Byte offset of the next tag, closing tag or comment at or after
    /// `from`, or the end of the source.
    ///
    /// A `<` that does not start markup (as in `{{ a < b }}`) is text.
    fn find_markup(&self, from: usize) -> usize {
        let source = self.cursor.source;
        source[from..]
            .match_indices('<')
            .map(|(i, _)| from + i)
            .find(|&i| {
                let rest = &source[i + 1..];
                let starts_name = |s: &str| s.starts_with(|c: char| c.is_ascii_alphabetic());
                rest.starts_with("!--")
                    || starts_name(rest)
                    || rest.strip_prefix('/').is_some_and(starts_name)
            })
            .unwrap_or(source.len())
    }

    /// Parses sibling nodes until the closing tag of `parent` or end of input.
    fn parse_nodes(&mut self, parent: Option<&str>) -> Vec<TemplateNode> {
        let mut nodes = Vec::new();
        loop {
            let text_start = self.cursor.prev_end();
            let text_end = self.find_markup(text_start);
            if text_end > text_start {
                nodes.push(self.text_node(text_start, text_end));
                self.cursor.advance_to(text_end);
            }

            match self.cursor.current_kind() {
                TokenKind::Eof => break,
                TokenKind::CommentOpen => {
                    let (data, span) = self.cursor.skip_comment();
                    if self.options.comments {
                        nodes.push(TemplateNode::Comment(Comment {
                            data: data.to_string(),
                            span,
                        }));
                    }
                }
                TokenKind::LAngleSlash => {
                    if parent.is_some() {
                        break;
                    }
                    // Closing tag with nothing open: report and drop it.
                    if let Some((name, span)) = self.cursor.parse_closing_tag() {
                        self.error(
                            ParseErrorKind::StrayClosingTag {
                                tag_name: name.to_string(),
                            },
                            span,
                        );
                    }
                }
                TokenKind::LAngle => {
                    if let Some(element) = self.parse_element() {
                        nodes.push(TemplateNode::Element(element));
                    }
                }
                _ => self.cursor.advance(),
            }
        }
        nodes
    }

    fn text_node(&self, start: usize, end: usize) -> TemplateNode {
        let text = &self.cursor.source[start..end];
        let span = Span::from_usize(start, end);
        match parse_text(text) {
            Some(tokens) => TemplateNode::DynamicText(DynamicText { tokens, span }),
            None => TemplateNode::StaticText(StaticText {
                text: text.to_string(),
                span,
            }),
        }
    }

    /// Parses an element starting at `<`.
    fn parse_element(&mut self) -> Option<Element> {
        let start = self.cursor.current().span.start;
        self.cursor.advance();

        if !self.cursor.check(TokenKind::Name) {
            let found = self.cursor.current_kind().name();
            self.cursor.error_here(ParseErrorKind::UnexpectedToken {
                expected: "tag name",
                found,
            });
            return None;
        }
        let tag = SmolStr::new(self.cursor.current_text());
        self.cursor.advance();

        let start_tag = self.cursor.parse_start_tag_rest();
        let mut element = Element {
            tag: tag.clone(),
            attrs_map: start_tag.attrs,
            ..Element::default()
        };

        match start_tag.end {
            TagEnd::SelfClosing => {}
            TagEnd::Open if is_void_element(&tag) => {}
            TagEnd::Open => {
                let children = self.parse_nodes(Some(&tag));
                element.children = self.chain_branches(children);
                self.parse_closing_tag(&tag, start);
            }
            TagEnd::Eof => {
                self.error(
                    ParseErrorKind::UnclosedTag {
                        tag_name: tag.to_string(),
                    },
                    Span::new(start, self.cursor.current().span.start),
                );
            }
        }
        element.span = Span::from_usize(usize::from(start), self.cursor.prev_end());

        if is_forbidden_tag(&tag, &element.attrs_map) {
            self.error(
                ParseErrorKind::ForbiddenTag {
                    tag_name: tag.to_string(),
                },
                element.span,
            );
            return None;
        }

        self.process_directives(&mut element);
        Some(element)
    }

    fn parse_closing_tag(&mut self, tag: &str, start: TextSize) {
        if self.cursor.check(TokenKind::Eof) {
            let end = self.cursor.current().span.end;
            self.error(
                ParseErrorKind::UnclosedTag {
                    tag_name: tag.to_string(),
                },
                Span::new(start, end),
            );
            return;
        }

        if let Some((found, span)) = self.cursor.parse_closing_tag() {
            if !found.eq_ignore_ascii_case(tag) {
                self.error(
                    ParseErrorKind::MismatchedClosingTag {
                        expected: tag.to_string(),
                        found: found.to_string(),
                    },
                    span,
                );
            }
        }
    }

    /// Extracts the `v-for`, `v-if`, `v-else-if`, `v-else` and `v-html`
    /// annotations from the attribute map.
    fn process_directives(&mut self, element: &mut Element) {
        if let Some(expression) = element.attr("v-for").map(str::to_string) {
            match parse_for(&expression) {
                Some(parsed) => {
                    element.for_source = Some(parsed.source);
                    element.alias = Some(parsed.alias);
                    element.iterator1 = parsed.iterator1;
                    element.iterator2 = parsed.iterator2;
                }
                None => {
                    self.error(ParseErrorKind::InvalidFor { expression }, element.span);
                }
            }
        }

        element.if_condition = element.attr("v-if").map(str::to_string);
        if element.if_condition.is_none() {
            element.else_if_condition = element.attr("v-else-if").map(str::to_string);
            element.is_else = element.attrs_map.contains_key("v-else");
        }
        element.html = element.attr("v-html").map(str::to_string);
    }

    /// Applies sibling rules to a freshly parsed child list.
    ///
    /// `v-else-if` / `v-else` elements move into the `if_conditions` of the
    /// preceding `v-if` element. Whitespace-only text collapses to a single
    /// space, and is dropped at both ends of the list and between chained
    /// branches.
    fn chain_branches(&mut self, nodes: Vec<TemplateNode>) -> Vec<TemplateNode> {
        let mut out: Vec<TemplateNode> = Vec::with_capacity(nodes.len());

        for node in nodes {
            match node {
                TemplateNode::Element(element) if element.is_branch() => {
                    self.attach_branch(&mut out, element);
                }
                TemplateNode::StaticText(text) if text.text.trim().is_empty() => {
                    if !out.is_empty() {
                        out.push(TemplateNode::StaticText(StaticText {
                            text: " ".to_string(),
                            span: text.span,
                        }));
                    }
                }
                other => out.push(other),
            }
        }

        while out.last().is_some_and(TemplateNode::is_whitespace) {
            out.pop();
        }
        out
    }

    fn attach_branch(&mut self, out: &mut Vec<TemplateNode>, element: Element) {
        while let Some(node) = out.pop_if_not_element() {
            if let TemplateNode::StaticText(StaticText { text, span }) = &node {
                if !text.trim().is_empty() {
                    let kind = ParseErrorKind::TextBetweenBranches {
                        text: text.trim().to_string(),
                    };
                    self.error(kind, *span);
                }
            } else if let TemplateNode::DynamicText(text) = &node {
                let raw = text.span.slice(self.cursor.source).unwrap_or("").trim();
                let kind = ParseErrorKind::TextBetweenBranches {
                    text: raw.to_string(),
                };
                self.error(kind, text.span);
            }
        }

        match out.last_mut() {
            Some(TemplateNode::Element(prev)) if prev.if_condition.is_some() => {
                prev.if_conditions.push(IfCondition {
                    condition: element.else_if_condition.clone(),
                    block: element,
                });
            }
            _ => {
                let directive = if element.else_if_condition.is_some() {
                    "v-else-if"
                } else {
                    "v-else"
                };
                self.error(
                    ParseErrorKind::ElseWithoutIf {
                        directive,
                        tag_name: element.tag.to_string(),
                    },
                    element.span,
                );
            }
        }
    }

    /// Picks the single root element out of the top-level nodes.
    fn select_root(&mut self, nodes: Vec<TemplateNode>) -> Option<Element> {
        let mut root: Option<Element> = None;
        for node in nodes {
            match node {
                TemplateNode::Element(element) => {
                    if root.is_none() {
                        root = Some(element);
                    } else {
                        self.error(ParseErrorKind::MultipleRoots, element.span);
                    }
                }
                TemplateNode::StaticText(text) if text.text.trim().is_empty() => {}
                TemplateNode::StaticText(_) | TemplateNode::DynamicText(_) => {
                    let span = node.span();
                    let text = span.slice(self.cursor.source).unwrap_or("").trim();
                    let kind = ParseErrorKind::TextOutsideRoot {
                        text: text.to_string(),
                    };
                    self.error(kind, span);
                }
                TemplateNode::Comment(_) => {}
            }
        }

        if root.is_none() && self.cursor.errors.is_empty() {
            let end = self.cursor.source.len();
            self.error(ParseErrorKind::EmptyTemplate, Span::from_usize(0, end));
        }
        root
    }
}

trait PopNonElement {
    /// Pops the last node unless it is an element.
    fn pop_if_not_element(&mut self) -> Option<TemplateNode>;
}

impl PopNonElement for Vec<TemplateNode> {
    fn pop_if_not_element(&mut self) -> Option<TemplateNode> {
        match self.last() {
            Some(TemplateNode::Element(_)) | None => None,
            Some(_) => self.pop(),
        }
    }
}
