//! Template AST types.
//!
//! The tree keeps Vue's shape: every element carries its raw attribute map
//! plus the control-flow annotations extracted from `v-for`, `v-if`,
//! `v-else-if`, `v-else` and `v-html`. The directive attributes themselves
//! stay in `attrs_map` so consumers can decide how to skip them.

use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::Span;

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum TemplateNode {
    Element(Element),
    DynamicText(DynamicText),
    StaticText(StaticText),
    Comment(Comment),
}

impl TemplateNode {
    pub fn span(&self) -> Span {
        match self {
            TemplateNode::Element(e) => e.span,
            TemplateNode::DynamicText(t) => t.span,
            TemplateNode::StaticText(t) => t.span,
            TemplateNode::Comment(c) => c.span,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            TemplateNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true for static text made only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TemplateNode::StaticText(t) if t.text.trim().is_empty())
    }
}

/// An element such as `<div>` or `<my-component>`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Element {
    pub tag: SmolStr,
    /// Raw attribute name to raw value, in source order. Boolean attributes
    /// map to an empty string.
    pub attrs_map: IndexMap<SmolStr, String>,
    pub children: Vec<TemplateNode>,
    /// Iterated expression of `v-for`.
    pub for_source: Option<String>,
    /// Item alias of `v-for`.
    pub alias: Option<String>,
    /// Second `v-for` alias (index, or key for objects).
    pub iterator1: Option<String>,
    /// Third `v-for` alias (index when iterating objects).
    pub iterator2: Option<String>,
    pub if_condition: Option<String>,
    pub is_else: bool,
    pub else_if_condition: Option<String>,
    /// Branches chained after this element's own `v-if`, in source order.
    ///
    /// Only an element with `if_condition` collects branches; the `v-else-if`
    /// and `v-else` siblings are moved here and no longer appear among the
    /// parent's children.
    pub if_conditions: Vec<IfCondition>,
    /// Expression of `v-html`.
    pub html: Option<String>,
    pub span: Span,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs_map.get(name).map(String::as_str)
    }

    pub fn has_loop(&self) -> bool {
        self.for_source.is_some()
    }

    /// Returns true if this element is a `v-else` or `v-else-if` branch.
    pub fn is_branch(&self) -> bool {
        self.is_else || self.else_if_condition.is_some()
    }
}

/// One `v-else-if` / `v-else` branch chained onto a `v-if` element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IfCondition {
    /// `None` for `v-else`.
    pub condition: Option<String>,
    pub block: Element,
}

/// Text containing at least one `{{ }}` interpolation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DynamicText {
    pub tokens: Vec<TextToken>,
    pub span: Span,
}

/// A piece of interpolated text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TextToken {
    /// Raw text between interpolations.
    Literal(String),
    /// Trimmed expression inside `{{ }}`.
    Binding(String),
}

/// Text without interpolations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StaticText {
    pub text: String,
    pub span: Span,
}

/// An HTML comment, kept only when requested.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Comment {
    /// Text between `<!--` and `-->`.
    pub data: String,
    pub span: Span,
}
