//! Vue 2 single-file component parsing for vue2svelte.
//!
//! This crate provides:
//! - [`parse_sfc`]: splits a `.vue` file into its `<template>`, `<script>`
//!   and `<style>` blocks
//! - [`parse_template`]: parses template markup into a tree of
//!   [`TemplateNode`]s annotated with `v-for` / `v-if` / `v-html` data
//!
//! Both share a `logos` lexer and collect every error they encounter
//! instead of stopping at the first one.
//!
//! # Example
//!
//! ```
//! use vue_parser::{parse_sfc, parse_template, TemplateParseOptions};
//!
//! let source = r#"
//! <template>
//!   <ul>
//!     <li v-for="item in items">{{ item }}</li>
//!   </ul>
//! </template>
//! "#;
//!
//! let sfc = parse_sfc(source);
//! let template = sfc.descriptor.template.unwrap();
//! let result = parse_template(&template.content, TemplateParseOptions::default());
//! assert!(result.errors.is_empty());
//! assert_eq!(result.root.unwrap().tag, "ul");
//! ```

mod ast;
mod cursor;
mod directive;
mod error;
mod lexer;
mod parser;
mod sfc;

pub use ast::*;
pub use directive::{parse_for, parse_text, ForExpression};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::is_void_element;
pub use sfc::{SfcBlock, SfcDescriptor, SfcParseResult, SfcStyleBlock};
pub use source_map::Span;

/// Options for parsing templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateParseOptions {
    /// Keep HTML comments as [`TemplateNode::Comment`] nodes.
    pub comments: bool,
}

/// The result of parsing a template.
#[derive(Debug)]
pub struct TemplateParseResult {
    /// The root element, if one could be determined.
    pub root: Option<Element>,
    /// Errors with spans relative to the parsed text.
    pub errors: Vec<ParseError>,
}

/// Splits a single-file component into blocks.
pub fn parse_sfc(source: &str) -> SfcParseResult {
    let result = sfc::SfcParser::new(source).parse();
    tracing::debug!(
        template = result.descriptor.template.is_some(),
        script = result.descriptor.script.is_some(),
        styles = result.descriptor.styles.len(),
        errors = result.errors.len(),
        "split component"
    );
    result
}

/// Parses template markup.
///
/// Errors do not stop the parser; callers should treat a non-empty
/// `errors` list as a failed parse.
pub fn parse_template(text: &str, options: TemplateParseOptions) -> TemplateParseResult {
    let result = parser::TemplateParser::new(text, options).parse();
    tracing::debug!(errors = result.errors.len(), "parsed template");
    result
}
