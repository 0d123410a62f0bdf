//! `<style>` block processing.
//!
//! Vue styles are global unless `scoped`, while Svelte scopes every style
//! block. Unscoped blocks therefore get each top-level selector wrapped in
//! `:global(…)`. The stylesheet is normalized through lightningcss first
//! and the wrapping is applied to its printed output.
//!
//! Scoped blocks may use Vue's deep combinators (`>>>`, `/deep/`,
//! `::v-deep`); everything after one is moved into `:global(…)`. CSS that
//! lightningcss rejects is kept as written and reported.

use crate::diagnostic::{DiagnosticCode, Diagnostics};
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use vue_parser::SfcStyleBlock;

/// At-rules whose blocks contain style rules.
const GROUPING_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "layer",
    "container",
    "document",
    "-moz-document",
    "starting-style",
];

/// Converts one style block into a Svelte `<style>` element followed by a
/// blank line.
pub(crate) fn convert_style(style: &SfcStyleBlock, diagnostics: &mut Diagnostics) -> String {
    let block = &style.block;
    if let Some(lang) = block.lang().filter(|lang| *lang != "css") {
        diagnostics.warn_at(
            DiagnosticCode::UnsupportedStyleLang,
            format!("<style lang=\"{}\"> is copied as is, selectors are not made global", lang),
            block.span,
        );
        return format!(
            "<style lang=\"{}\">\n{}\n</style>\n\n",
            lang,
            block.content.trim()
        );
    }

    let source = if style.scoped {
        rewrite_deep(&block.content)
    } else {
        block.content.clone()
    };
    let mut css = match pretty_print(&source) {
        Ok(css) => css,
        Err(message) => {
            diagnostics.warn_at(
                DiagnosticCode::UnparsedStyle,
                format!("unable to parse <style> block, copied as is: {}", message),
                block.content_span,
            );
            source.trim().to_string()
        }
    };
    if !style.scoped {
        css = wrap_global(&css);
    }
    if !css.is_empty() && !css.ends_with('\n') {
        css.push('\n');
    }
    format!("<style>\n{}</style>\n\n", css)
}

/// Parses and re-prints a stylesheet without minification.
pub fn pretty_print(css: &str) -> Result<String, String> {
    let parser_options = ParserOptions {
        filename: "component.css".to_string(),
        ..Default::default()
    };
    let stylesheet = StyleSheet::parse(css, parser_options).map_err(|e| e.to_string())?;

    let printer_options = PrinterOptions {
        minify: false,
        ..Default::default()
    };
    stylesheet
        .to_css(printer_options)
        .map(|result| result.code)
        .map_err(|e| format!("{:?}", e))
}

/// Wraps every selector of every top-level style rule (including rules in
/// grouping at-rules such as `@media`) as `:global(selector)`.
pub fn wrap_global(css: &str) -> String {
    map_selectors(css, |selector| format!(":global({})", selector))
}

/// Moves whatever follows a deep combinator into `:global(…)`:
/// `.a >>> .b` becomes `.a :global(.b)`.
pub fn rewrite_deep(css: &str) -> String {
    map_selectors(css, unwrap_deep)
}

/// Rewrites every selector of every style rule, including rules nested in
/// grouping at-rules.
fn map_selectors(css: &str, map: fn(&str) -> String) -> String {
    let mut rewriter = SelectorRewriter {
        css,
        pos: 0,
        out: String::with_capacity(css.len() + css.len() / 4),
        map,
    };
    rewriter.rules();
    // Unbalanced input: copy whatever is left.
    rewriter.out.push_str(&css[rewriter.pos..]);
    rewriter.out
}

struct SelectorRewriter<'a> {
    css: &'a str,
    pos: usize,
    out: String,
    map: fn(&str) -> String,
}

impl<'a> SelectorRewriter<'a> {
    fn peek(&self) -> Option<u8> {
        self.css.as_bytes().get(self.pos).copied()
    }

    fn copy_to(&mut self, end: usize) {
        self.out.push_str(&self.css[self.pos..end]);
        self.pos = end;
    }

    /// Rule list, up to the closing brace of the enclosing block or the end.
    fn rules(&mut self) {
        loop {
            let rest = &self.css[self.pos..];
            let ws = rest.len() - rest.trim_start().len();
            self.copy_to(self.pos + ws);

            match self.peek() {
                None | Some(b'}') => return,
                _ => {}
            }

            let (end, terminator) = self.scan_prelude();
            let prelude = &self.css[self.pos..end];
            match terminator {
                Some(b'{') => {
                    if let Some(at_rule) = prelude.strip_prefix('@') {
                        self.copy_to(end + 1);
                        let name = at_rule
                            .split(|c: char| c.is_whitespace() || c == '(' || c == '{')
                            .next()
                            .unwrap_or("")
                            .to_ascii_lowercase();
                        if GROUPING_AT_RULES.contains(&name.as_str()) {
                            self.rules();
                        } else {
                            self.block_body();
                        }
                    } else {
                        self.out.push_str(&map_selector_list(prelude, self.map));
                        self.out.push('{');
                        self.pos = end + 1;
                        self.block_body();
                    }
                    if self.peek() == Some(b'}') {
                        self.copy_to(self.pos + 1);
                    }
                }
                Some(_) => self.copy_to(end + 1),
                None => {
                    self.copy_to(end);
                    return;
                }
            }
        }
    }

    /// Finds the `{` or `;` ending a prelude, skipping strings and parens.
    fn scan_prelude(&self) -> (usize, Option<u8>) {
        let bytes = self.css.as_bytes();
        let mut i = self.pos;
        let mut parens = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => i = skip_string(bytes, i),
                b'(' | b'[' => parens += 1,
                b')' | b']' => parens = parens.saturating_sub(1),
                b'{' | b';' if parens == 0 => return (i, Some(bytes[i])),
                _ => {}
            }
            i += 1;
        }
        (bytes.len(), None)
    }

    /// Copies a declaration block verbatim, stopping before its closing brace.
    fn block_body(&mut self) {
        let bytes = self.css.as_bytes();
        let mut i = self.pos;
        let mut depth = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => i = skip_string(bytes, i),
                b'{' => depth += 1,
                b'}' if depth == 0 => break,
                b'}' => depth -= 1,
                _ => {}
            }
            i += 1;
        }
        self.copy_to(i.min(bytes.len()));
    }
}

/// Index of the closing quote of the string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b if b == quote => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len().saturating_sub(1)
}

/// Applies `map` to each selector of a comma-separated list, keeping the
/// trailing whitespace.
fn map_selector_list(prelude: &str, map: fn(&str) -> String) -> String {
    let selectors = prelude.trim_end();
    let trailing = &prelude[selectors.len()..];

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = selectors.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&selectors[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&selectors[start..]);

    let mapped: Vec<String> = parts.iter().map(|part| map(part.trim())).collect();
    format!("{}{}", mapped.join(", "), trailing)
}

const DEEP_COMBINATORS: &[&str] = &[">>>", "/deep/", "::v-deep"];

/// `.a >>> .b` becomes `.a :global(.b)`; a selector without a deep
/// combinator is returned unchanged.
fn unwrap_deep(selector: &str) -> String {
    let bytes = selector.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                let rest = &bytes[i..];
                if let Some(combinator) = DEEP_COMBINATORS
                    .iter()
                    .find(|c| rest.starts_with(c.as_bytes()))
                {
                    let head = selector[..i].trim_end();
                    let tail = selector[i + combinator.len()..].trim();
                    if tail.is_empty() {
                        return head.to_string();
                    }
                    return if head.is_empty() {
                        format!(":global({})", tail)
                    } else {
                        format!("{} :global({})", head, tail)
                    };
                }
            }
            _ => {}
        }
        i += 1;
    }
    selector.to_string()
}
