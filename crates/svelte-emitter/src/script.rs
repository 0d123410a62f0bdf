//! Script parsing and `this` rewriting.
//!
//! The script is parsed once with swc. Rewrites never touch the tree: a
//! [`Rewriter`] walks a node and records byte ranges to cut (`this.`,
//! `.bind(this)`), and [`ScriptSource::print`] slices the original text
//! with those ranges removed. Everything the rewriter does not cut is
//! reproduced exactly as written, comments included.

use crate::diagnostic::{DiagnosticCode, Diagnostics};
use crate::error::ConvertError;
use source_map::{Span, TextSize};
use std::ops::Range;
use std::sync::Arc;
use swc_common::{BytePos, FileName, SourceMap, Span as SwcSpan, Spanned};
use swc_ecma_ast::*;
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

/// Language of a `<script>` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptLang {
    #[default]
    JavaScript,
    TypeScript,
}

impl ScriptLang {
    pub fn from_attr(lang: Option<&str>) -> Self {
        match lang {
            Some("ts" | "typescript") => ScriptLang::TypeScript,
            _ => ScriptLang::JavaScript,
        }
    }
}

/// Script text plus the mapping from swc positions to byte offsets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScriptSource<'a> {
    text: &'a str,
    file_start: BytePos,
    /// Offset of the script text within the component file.
    base: TextSize,
}

impl<'a> ScriptSource<'a> {
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.file_start.0) as usize
    }

    pub fn range(&self, span: SwcSpan) -> Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }

    /// Original text of `span`.
    pub fn text(&self, span: SwcSpan) -> &'a str {
        self.text.get(self.range(span)).unwrap_or("")
    }

    /// Location of `span` in the component file.
    pub fn file_span(&self, span: SwcSpan) -> Span {
        let range = self.range(span);
        Span::from_usize(range.start, range.end).shift(self.base)
    }

    /// Text of `range` with every removal inside it cut out.
    pub fn print(&self, range: Range<usize>, removals: &[Range<usize>]) -> String {
        let mut inside: Vec<&Range<usize>> = removals
            .iter()
            .filter(|r| r.start >= range.start && r.end <= range.end)
            .collect();
        inside.sort_by_key(|r| r.start);

        let mut out = String::with_capacity(range.len());
        let mut last = range.start;
        for removal in inside {
            if removal.start < last {
                continue;
            }
            out.push_str(self.text.get(last..removal.start).unwrap_or(""));
            last = removal.end;
        }
        out.push_str(self.text.get(last..range.end).unwrap_or(""));
        out
    }

    /// The whole script with the given ranges cut out.
    pub fn print_without(&self, removals: &[Range<usize>]) -> String {
        self.print(0..self.text.len(), removals)
    }
}

/// A parsed `<script>` block.
pub(crate) struct Script<'a> {
    pub module: Module,
    pub source: ScriptSource<'a>,
}

/// Parses script text as an ES module.
///
/// `base` is the offset of `text` in the component file and is only used
/// for error locations. Syntax errors the parser recovers from are reported
/// as warnings; the rest abort.
pub(crate) fn parse_script<'a>(
    text: &'a str,
    lang: ScriptLang,
    base: TextSize,
    diagnostics: &mut Diagnostics,
) -> Result<Script<'a>, ConvertError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("component-script".into()).into(),
        text.to_string(),
    );
    let source = ScriptSource {
        text,
        file_start: fm.start_pos,
        base,
    };

    let syntax = match lang {
        ScriptLang::TypeScript => Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            ..Default::default()
        }),
        ScriptLang::JavaScript => Syntax::Es(EsSyntax {
            jsx: false,
            decorators: true,
            ..Default::default()
        }),
    };

    let mut recovered = Vec::new();
    let module = parse_file_as_module(&fm, syntax, EsVersion::EsNext, None, &mut recovered)
        .map_err(|e| ConvertError::Script {
            message: e.kind().msg().to_string(),
            span: source.file_span(e.span()),
        })?;
    for error in recovered {
        diagnostics.warn_at(
            DiagnosticCode::RecoveredScriptError,
            format!("syntax error in script: {}", error.kind().msg()),
            source.file_span(error.span()),
        );
    }

    Ok(Script { module, source })
}

/// Collects the cuts that strip `this.` and `.bind(this)`.
///
/// Rules, applied top-down:
/// - `this.x` becomes `x` and `this[k]` becomes `k`, in expressions and
///   assignment targets alike;
/// - `function () {…}.bind(this)` becomes the function itself, which is
///   then entered;
/// - other function declarations and expressions are left untouched, so
///   nested closures keep their own `this`;
/// - arrow functions and object or class methods are entered.
pub(crate) struct Rewriter<'a, 'd> {
    source: ScriptSource<'a>,
    removals: Vec<Range<usize>>,
    diagnostics: &'d mut Diagnostics,
}

impl<'a, 'd> Rewriter<'a, 'd> {
    pub fn new(source: ScriptSource<'a>, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            source,
            removals: Vec::new(),
            diagnostics,
        }
    }

    /// Rewrites a node that is not top-level.
    pub fn nested<N: VisitWith<Self>>(&mut self, node: &N) {
        node.visit_with(self);
    }

    /// Rewrites a top-level function: its parameters and body are entered
    /// even though nested functions are not.
    pub fn top_level(&mut self, function: &Function) {
        function.visit_children_with(self);
    }

    pub fn finish(self) -> Vec<Range<usize>> {
        self.removals
    }

    fn remove(&mut self, lo: BytePos, hi: BytePos) {
        let range = self.source.offset(lo)..self.source.offset(hi);
        if !range.is_empty() {
            self.removals.push(range);
        }
    }
}

impl Visit for Rewriter<'_, '_> {
    fn visit_member_expr(&mut self, n: &MemberExpr) {
        if matches!(unparen(&n.obj), Expr::This(_)) {
            match &n.prop {
                MemberProp::Ident(prop) => {
                    self.remove(n.span.lo, prop.span.lo);
                    return;
                }
                MemberProp::Computed(computed) => {
                    let inner = computed.expr.span();
                    self.remove(n.span.lo, inner.lo);
                    self.remove(inner.hi, n.span.hi);
                    computed.expr.visit_with(self);
                    return;
                }
                MemberProp::PrivateName(_) => {}
            }
        }
        n.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, n: &CallExpr) {
        if let Some(function) = bound_to_this(n) {
            let inner = function.span();
            self.remove(n.span.lo, inner.lo);
            self.remove(inner.hi, n.span.hi);
            (*function.function).visit_children_with(self);
            return;
        }
        n.visit_children_with(self);
    }

    // Nested closures keep their own `this`.
    fn visit_fn_expr(&mut self, _: &FnExpr) {}

    fn visit_fn_decl(&mut self, _: &FnDecl) {}

    // swc only produces `Invalid` while recovering from a syntax error.
    fn visit_invalid(&mut self, n: &Invalid) {
        self.diagnostics.warn_at(
            DiagnosticCode::UnknownScriptNode,
            format!(
                "unable to rewrite `{}`, leaving it unchanged",
                self.source.text(n.span)
            ),
            self.source.file_span(n.span),
        );
    }
}

/// Strips any number of wrapping parentheses.
pub(crate) fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        _ => expr,
    }
}

/// Matches `function () {…}.bind(this)` and returns the function.
fn bound_to_this(call: &CallExpr) -> Option<&FnExpr> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Member(member) = unparen(callee) else {
        return None;
    };
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };
    let [arg] = call.args.as_slice() else {
        return None;
    };
    if prop.sym.as_str() != "bind" || arg.spread.is_some() || !matches!(*arg.expr, Expr::This(_)) {
        return None;
    }
    match unparen(&member.obj) {
        Expr::Fn(function) => Some(function),
        _ => None,
    }
}

/// Removes the indentation shared by every line after the first.
///
/// Fragments sliced out of a nested position keep their original
/// indentation on continuation lines; this pulls them back to column zero.
/// Text containing template literals is returned as is, since their
/// whitespace is significant.
pub(crate) fn dedent_tail(text: &str) -> String {
    if text.contains('`') {
        return text.to_string();
    }
    let indent = text
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    if indent == 0 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            // Indentation is counted in characters; lines may start with
            // multi-byte whitespace.
            let cut = line
                .char_indices()
                .take(indent)
                .find(|(_, c)| !c.is_whitespace())
                .map_or_else(|| skip_chars(line, indent), |(at, _)| at);
            out.push_str(&line[cut..]);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Byte offset just past the first `n` characters of `line`.
fn skip_chars(line: &str, n: usize) -> usize {
    line.char_indices().nth(n).map_or(line.len(), |(at, _)| at)
}

/// A function-valued member of the options object.
#[derive(Clone, Copy)]
pub(crate) enum FunctionMember<'n> {
    /// `key() {…}`
    Method { key: SwcSpan, function: &'n Function },
    /// `key: function () {…}`
    Expr(&'n FnExpr),
}

impl<'n> FunctionMember<'n> {
    pub fn function(&self) -> &'n Function {
        match self {
            FunctionMember::Method { function, .. } => function,
            FunctionMember::Expr(expr) => &expr.function,
        }
    }

    /// Where to start looking for the parameter list.
    fn signature_search_start(&self) -> BytePos {
        match self {
            FunctionMember::Method { key, .. } => key.hi,
            FunctionMember::Expr(expr) => expr
                .ident
                .as_ref()
                .map_or(expr.function.span.lo, |ident| ident.span.hi),
        }
    }
}

/// A rewritten function, split into the pieces needed to re-emit it as a
/// declaration or an arrow.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FunctionText {
    pub is_async: bool,
    pub is_generator: bool,
    /// Type parameters, parameters and return type: `(a, b): number`.
    pub signature: String,
    /// The block body including braces.
    pub body: String,
}

impl FunctionText {
    pub fn declaration(&self, name: &str) -> String {
        format!(
            "{}function{} {}{} {}",
            if self.is_async { "async " } else { "" },
            if self.is_generator { "*" } else { "" },
            name,
            self.signature,
            self.body
        )
    }

    /// Arrow form. Generators cannot be arrows and stay function expressions.
    pub fn arrow(&self) -> String {
        if self.is_generator {
            return format!(
                "{}function* {} {}",
                if self.is_async { "async " } else { "" },
                self.signature,
                self.body
            );
        }
        format!(
            "{}{} => {}",
            if self.is_async { "async " } else { "" },
            self.signature,
            self.body
        )
    }
}

impl<'a> ScriptSource<'a> {
    /// Rewrites a function as top-level and returns its pieces, or `None`
    /// for a bodiless declaration.
    pub fn rewrite_function(
        &self,
        member: FunctionMember<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Option<FunctionText> {
        let function = member.function();
        let body = function.body.as_ref()?;

        let mut rewriter = Rewriter::new(*self, diagnostics);
        rewriter.top_level(function);
        let removals = rewriter.finish();

        let search = self.offset(member.signature_search_start());
        let body_range = self.range(body.span);
        let head = self.text.get(search..body_range.start).unwrap_or("");
        let signature_start = head.find(['(', '<']).map_or(search, |i| search + i);

        Some(FunctionText {
            is_async: function.is_async,
            is_generator: function.is_generator,
            signature: self
                .print(signature_start..body_range.start, &removals)
                .trim()
                .to_string(),
            body: dedent_tail(&self.print(body_range, &removals)),
        })
    }

    /// Rewrites any node as nested code and returns its text.
    pub fn rewrite<N>(&self, node: &N, diagnostics: &mut Diagnostics) -> String
    where
        N: Spanned + for<'r, 'd> VisitWith<Rewriter<'r, 'd>>,
    {
        let mut rewriter = Rewriter::new(*self, diagnostics);
        rewriter.nested(node);
        let removals = rewriter.finish();
        dedent_tail(&self.print(self.range(node.span()), &removals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewrite_first_expr(code: &str) -> String {
        let mut diagnostics = Diagnostics::default();
        let script = parse_script(code, ScriptLang::JavaScript, TextSize::from(0), &mut diagnostics)
            .expect("script should parse");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &script.module.body[0] else {
            panic!("expected an expression statement");
        };
        script.source.rewrite(&*stmt.expr, &mut diagnostics)
    }

    #[test]
    fn test_member_access_on_this() {
        assert_eq!(rewrite_first_expr("this.a + this.b.c"), "a + b.c");
    }

    #[test]
    fn test_computed_member_on_this() {
        assert_eq!(rewrite_first_expr("this[this.key]"), "key");
    }

    #[test]
    fn test_assignment_target() {
        assert_eq!(rewrite_first_expr("this.count = this.count + 1"), "count = count + 1");
    }

    #[test]
    fn test_arrow_functions_are_entered() {
        assert_eq!(
            rewrite_first_expr("items.map(item => item * this.factor)"),
            "items.map(item => item * factor)"
        );
    }

    #[test]
    fn test_nested_function_is_untouched() {
        assert_eq!(
            rewrite_first_expr("setTimeout(function () { this.x = 1; })"),
            "setTimeout(function () { this.x = 1; })"
        );
    }

    #[test]
    fn test_bind_this_is_unwrapped() {
        assert_eq!(
            rewrite_first_expr("setTimeout(function () { this.x = 1; }.bind(this), 10)"),
            "setTimeout(function () { x = 1; }, 10)"
        );
        assert_eq!(
            rewrite_first_expr("on((function () { this.y(); }).bind(this))"),
            "on(function () { y(); })"
        );
    }

    #[test]
    fn test_bind_other_is_kept() {
        assert_eq!(
            rewrite_first_expr("f(function () { this.x; }.bind(other))"),
            "f(function () { this.x; }.bind(other))"
        );
    }

    #[test]
    fn test_object_methods_are_entered() {
        assert_eq!(
            rewrite_first_expr("({ run() { return this.v; } })"),
            "({ run() { return v; } })"
        );
    }

    #[test]
    fn test_dedent_tail() {
        assert_eq!(
            dedent_tail("{\n      a();\n      if (b) {\n        c();\n      }\n    }"),
            "{\n  a();\n  if (b) {\n    c();\n  }\n}"
        );
        assert_eq!(dedent_tail("x"), "x");
        assert_eq!(dedent_tail("`a\n    b`"), "`a\n    b`");
    }

    #[test]
    fn test_dedent_tail_counts_characters() {
        assert_eq!(
            dedent_tail("{\n      a();\n\u{3000}\u{3000}b();\n    }"),
            "{\n    a();\nb();\n  }"
        );
        assert_eq!(
            dedent_tail("{\n\u{a0}\u{a0}a();\n  }"),
            "{\na();\n}"
        );
    }

    #[test]
    fn test_recovered_syntax_error_is_reported() {
        let mut diagnostics = Diagnostics::default();
        let script = parse_script(
            "function f() { with (o) { g(); } }",
            ScriptLang::JavaScript,
            TextSize::from(10),
            &mut diagnostics,
        );
        assert!(script.is_ok());
        let items = diagnostics.into_vec();
        assert!(!items.is_empty());
        assert_eq!(items[0].code, DiagnosticCode::RecoveredScriptError);
        let span = items[0].span.expect("recovered errors are located");
        assert!(u32::from(span.start) >= 10, "span should be shifted: {:?}", span);
    }

    #[test]
    fn test_invalid_node_is_reported_and_kept() {
        let mut diagnostics = Diagnostics::default();
        let script = parse_script("a + b", ScriptLang::JavaScript, TextSize::from(4), &mut diagnostics)
            .expect("script should parse");
        let start = script.source.file_start.0;
        let node = Expr::Invalid(Invalid {
            span: SwcSpan::new(BytePos(start + 4), BytePos(start + 5)),
        });

        let mut rewriter = Rewriter::new(script.source, &mut diagnostics);
        rewriter.nested(&node);
        assert!(rewriter.finish().is_empty());

        let items = diagnostics.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, DiagnosticCode::UnknownScriptNode);
        assert_eq!(items[0].message, "unable to rewrite `b`, leaving it unchanged");
        assert_eq!(items[0].span, Some(Span::new(8u32, 9u32)));
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let mut diagnostics = Diagnostics::default();
        let result = parse_script("let = ;", ScriptLang::JavaScript, TextSize::from(10), &mut diagnostics);
        match result {
            Err(ConvertError::Script { span, .. }) => {
                assert!(u32::from(span.start) >= 10, "span should be shifted: {:?}", span)
            }
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("expected a syntax error"),
        }
    }

    #[test]
    fn test_typescript_parses() {
        let script = parse_script(
            "const n: number = 1;\nexport default { data() { return { n }; } }",
            ScriptLang::TypeScript,
            TextSize::from(0),
            &mut Diagnostics::default(),
        );
        assert!(script.is_ok());
    }
}
