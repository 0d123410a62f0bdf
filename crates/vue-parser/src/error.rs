//! Parse error types.

use source_map::Span;
use thiserror::Error;

/// An error that occurred while splitting a component or parsing its template.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Location relative to the text handed to the parser.
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag { tag_name: String },

    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag { expected: String, found: String },

    #[error("unexpected closing tag </{tag_name}>")]
    StrayClosingTag { tag_name: String },

    #[error("unclosed attribute value")]
    UnclosedAttributeValue,

    #[error("unclosed comment")]
    UnclosedComment,

    #[error("duplicate attribute: {name}")]
    DuplicateAttribute { name: String },

    /// `<script>` and `<style>` are not allowed inside a template.
    #[error("<{tag_name}> is not allowed inside a template")]
    ForbiddenTag { tag_name: String },

    #[error("invalid v-for expression: {expression}")]
    InvalidFor { expression: String },

    #[error("{directive} used on element <{tag_name}> without corresponding v-if")]
    ElseWithoutIf {
        directive: &'static str,
        tag_name: String,
    },

    #[error("text \"{text}\" between v-if and v-else(-if) is not allowed")]
    TextBetweenBranches { text: String },

    #[error(
        "component template should contain exactly one root element; \
         use v-else-if to chain additional root elements"
    )]
    MultipleRoots,

    #[error("text \"{text}\" outside the root element")]
    TextOutsideRoot { text: String },

    #[error("component template requires a root element")]
    EmptyTemplate,

    #[error("unclosed <{tag_name}> block")]
    UnclosedBlock { tag_name: String },

    #[error("a component may contain only one <{tag_name}> block")]
    DuplicateBlock { tag_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnclosedTag {
                tag_name: "div".to_string(),
            },
            Span::new(0u32, 5u32),
        );
        assert_eq!(error.to_string(), "unclosed tag: <div>");
    }

    #[test]
    fn test_else_without_if_display() {
        let kind = ParseErrorKind::ElseWithoutIf {
            directive: "v-else-if",
            tag_name: "p".to_string(),
        };
        assert_eq!(
            kind.to_string(),
            "v-else-if used on element <p> without corresponding v-if"
        );
    }
}
