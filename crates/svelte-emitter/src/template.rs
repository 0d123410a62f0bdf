//! Svelte markup generation from the Vue template tree.

use crate::assemble::ConvertOptions;
use crate::diagnostic::{DiagnosticCode, Diagnostics};
use source_map::TextSize;
use std::fmt::Write;
use vue_parser::{is_void_element, Element, TemplateNode, TextToken};

/// Directive attributes already folded into the element's control flow.
const CONTROL_FLOW_ATTRS: [&str; 4] = ["v-if", "v-else", "v-else-if", "v-for"];

/// Writes a template tree as Svelte markup.
pub(crate) struct TemplateEmitter<'o, 'd> {
    options: &'o ConvertOptions,
    diagnostics: &'d mut Diagnostics,
    /// Offset of the template content in the component file.
    base: TextSize,
    out: String,
}

impl<'o, 'd> TemplateEmitter<'o, 'd> {
    pub fn new(options: &'o ConvertOptions, diagnostics: &'d mut Diagnostics, base: TextSize) -> Self {
        Self {
            options,
            diagnostics,
            base,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(&self.options.indent);
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.indent(depth);
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn emit(&mut self, node: &TemplateNode, depth: usize) {
        match node {
            TemplateNode::Element(element) => self.element(element, depth),
            TemplateNode::DynamicText(text) => {
                let mut content = String::new();
                for token in &text.tokens {
                    match token {
                        TextToken::Literal(literal) => content.push_str(literal),
                        TextToken::Binding(binding) => {
                            let _ = write!(content, "{{{}}}", binding);
                        }
                    }
                }
                self.line(depth, content.trim());
            }
            TemplateNode::StaticText(text) => {
                self.out.push_str(text.text.trim());
            }
            TemplateNode::Comment(comment) => {
                self.line(depth, &format!("<!--{}-->", comment.data));
            }
        }
    }

    pub fn element(&mut self, element: &Element, mut depth: usize) {
        let looped = match &element.for_source {
            Some(source) => {
                let mut head = format!(
                    "{{#each {} as {}",
                    source,
                    element.alias.as_deref().unwrap_or("item")
                );
                if let Some(index) = &element.iterator1 {
                    let _ = write!(head, ", {}", index);
                }
                head.push('}');
                self.line(depth, &head);
                depth += 1;
                true
            }
            None => false,
        };

        let opens_if = element.if_condition.is_some();
        let branch_head = if let Some(condition) = &element.if_condition {
            Some(format!("{{#if {}}}", condition))
        } else if element.is_else {
            Some("{:else}".to_string())
        } else {
            element
                .else_if_condition
                .as_ref()
                .map(|condition| format!("{{:else if {}}}", condition))
        };
        if let Some(head) = branch_head {
            self.line(depth, &head);
            depth += 1;
        }

        self.indent(depth);
        self.out.push('<');
        self.out.push_str(&element.tag);

        let (attrs, html) = self.attributes(element);
        if !attrs.is_empty() {
            let mut separator = String::from("\n");
            for _ in 0..depth {
                separator.push_str(&self.options.indent);
            }
            separator.push_str(&" ".repeat(element.tag.chars().count() + 2));
            self.out.push(' ');
            self.out.push_str(&attrs.join(&separator));
        }

        let childless = element.children.is_empty();
        if childless && (html.is_some() || is_void_element(&element.tag)) {
            self.out.push_str("/>\n");
        } else {
            self.out.push_str(">\n");
            if let Some(html) = html {
                self.line(depth + 1, &format!("{{@html {}}}", html));
                if !childless {
                    let span = element.span.shift(self.base);
                    self.diagnostics.warn_at(
                        DiagnosticCode::HtmlChildrenIgnored,
                        format!(
                            "<{}> has children and a v-html directive, its children will be ignored",
                            element.tag
                        ),
                        span,
                    );
                }
            } else {
                for child in &element.children {
                    self.emit(child, depth + 1);
                }
            }
            self.line(depth, &format!("</{}>", element.tag));
        }

        for branch in &element.if_conditions {
            self.element(&branch.block, depth.saturating_sub(1));
        }

        if opens_if {
            depth -= 1;
            self.line(depth, "{/if}");
        }
        if looped {
            depth -= 1;
            self.line(depth, "{/each}");
        }
    }

    /// Translated attributes in source order, plus the `v-html` expression.
    fn attributes<'e>(&self, element: &'e Element) -> (Vec<String>, Option<&'e str>) {
        let quote = if self.options.quote_bound_attributes { "\"" } else { "" };
        let mut attrs = Vec::with_capacity(element.attrs_map.len());
        let mut html = None;

        for (name, value) in &element.attrs_map {
            let name = name.as_str();
            if CONTROL_FLOW_ATTRS.contains(&name) {
                continue;
            }
            if name == "v-html" {
                html = Some(value.as_str());
            } else if let Some(key) = name.strip_prefix(':').or_else(|| name.strip_prefix("v-bind:")) {
                if self.options.shorthand_bindings && key == value {
                    attrs.push(format!("{{{}}}", key));
                } else {
                    attrs.push(format!("{}={}{{{}}}{}", key, quote, value, quote));
                }
            } else if let Some(event) = name.strip_prefix('@').or_else(|| name.strip_prefix("v-on:")) {
                attrs.push(format!("on:{}={}{{{}}}{}", event, quote, value, quote));
            } else {
                attrs.push(format!("{}=\"{}\"", name, value));
            }
        }
        (attrs, html)
    }
}
