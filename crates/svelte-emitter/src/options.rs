//! Classification of the component options object.
//!
//! Walks the members of `export default { … }` in source order and turns
//! each recognized one into Svelte instance-script declarations.

use crate::diagnostic::{DiagnosticCode, Diagnostics};
use crate::script::{unparen, FunctionMember, ScriptLang, ScriptSource};
use smol_str::SmolStr;
use std::fmt::Write;
use swc_common::{Span as SwcSpan, Spanned};
use swc_ecma_ast::*;

/// Vue lifecycle hooks that map onto Svelte lifecycle functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    Mounted,
    BeforeUpdate,
    Updated,
    Destroyed,
}

impl LifecycleHook {
    /// The function imported from `svelte`.
    pub fn svelte_name(&self) -> &'static str {
        match self {
            LifecycleHook::Mounted => "onMount",
            LifecycleHook::BeforeUpdate => "beforeUpdate",
            LifecycleHook::Updated => "afterUpdate",
            LifecycleHook::Destroyed => "onDestroy",
        }
    }
}

/// A key of the options object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsEntry {
    Name,
    Props,
    Data,
    Computed,
    Methods,
    Lifecycle(LifecycleHook),
    BeforeCreate,
    Created,
    Unrecognized(SmolStr),
}

impl OptionsEntry {
    pub fn classify(key: &str) -> Self {
        match key {
            "name" => OptionsEntry::Name,
            "props" => OptionsEntry::Props,
            "data" => OptionsEntry::Data,
            "computed" => OptionsEntry::Computed,
            "methods" => OptionsEntry::Methods,
            "mounted" => OptionsEntry::Lifecycle(LifecycleHook::Mounted),
            "beforeUpdate" => OptionsEntry::Lifecycle(LifecycleHook::BeforeUpdate),
            "updated" => OptionsEntry::Lifecycle(LifecycleHook::Updated),
            "destroyed" => OptionsEntry::Lifecycle(LifecycleHook::Destroyed),
            "beforeCreate" => OptionsEntry::BeforeCreate,
            "created" => OptionsEntry::Created,
            other => OptionsEntry::Unrecognized(SmolStr::new(other)),
        }
    }
}

/// Declarations collected from the options object, grouped by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceScript {
    /// Lifecycle functions to import from `svelte`.
    pub imports: Vec<&'static str>,
    pub props: Vec<String>,
    pub data: Vec<String>,
    pub computed: Vec<String>,
    pub before_create: Option<String>,
    pub created: Option<String>,
    /// Method declarations and lifecycle registrations, in member order.
    pub methods: Vec<String>,
}

impl InstanceScript {
    /// Renders the `<script>` block followed by a blank line.
    pub fn render(&self, lang: ScriptLang) -> String {
        let mut out = String::from(match lang {
            ScriptLang::TypeScript => "<script lang=\"ts\">",
            ScriptLang::JavaScript => "<script>",
        });
        if !self.imports.is_empty() {
            let _ = write!(out, "\nimport {{ {} }} from 'svelte';", self.imports.join(", "));
        }

        out.push('\n');
        let declarations: Vec<&str> = self
            .props
            .iter()
            .chain(&self.data)
            .chain(&self.computed)
            .map(String::as_str)
            .collect();
        out.push_str(&declarations.join("\n"));
        out.push('\n');

        if let Some(code) = &self.before_create {
            let _ = write!(out, "\n// beforeCreate:\n{}\n", code);
        }
        if let Some(code) = &self.created {
            let _ = write!(out, "\n// created:\n{}\n", code);
        }

        out.push('\n');
        out.push_str(&self.methods.join("\n\n"));
        out.push_str("\n</script>\n\n");
        out
    }
}

/// The value side of an options member.
#[derive(Clone, Copy)]
enum MemberValue<'n> {
    Expr(&'n Expr),
    Method(FunctionMember<'n>),
    Shorthand,
    /// Getter, setter or assignment pattern.
    Accessor,
}

struct Member<'n> {
    name: &'n str,
    value: MemberValue<'n>,
    span: SwcSpan,
}

impl<'n> Member<'n> {
    /// The member as a function, if it is a method or a function expression.
    fn function(&self) -> Option<FunctionMember<'n>> {
        match self.value {
            MemberValue::Method(function) => Some(function),
            MemberValue::Expr(expr) => match unparen(expr) {
                Expr::Fn(function) => Some(FunctionMember::Expr(function)),
                _ => None,
            },
            _ => None,
        }
    }

    fn object(&self) -> Option<&'n ObjectLit> {
        match self.value {
            MemberValue::Expr(expr) => match unparen(expr) {
                Expr::Object(object) => Some(object),
                _ => None,
            },
            _ => None,
        }
    }
}

/// What a `data` member evaluates to.
enum DataShape<'n> {
    Object(&'n ObjectLit),
    TooComplex,
    Invalid,
}

/// Returns the argument of a body made of a single `return <expr>`.
fn single_return(block: &BlockStmt) -> Option<&Expr> {
    match block.stmts.as_slice() {
        [Stmt::Return(ReturnStmt { arg: Some(arg), .. })] => Some(arg),
        _ => None,
    }
}

/// The expression a factory function returns: `() => x`, `() => { return x }`
/// or `function () { return x }`.
fn factory_result(expr: &Expr) -> Option<&Expr> {
    match unparen(expr) {
        Expr::Arrow(arrow) => match &*arrow.body {
            BlockStmtOrExpr::Expr(body) => Some(unparen(body)),
            BlockStmtOrExpr::BlockStmt(block) => single_return(block),
        },
        Expr::Fn(function) => function.function.body.as_ref().and_then(single_return),
        _ => None,
    }
}

fn is_false_literal(expr: &Expr) -> bool {
    matches!(unparen(expr), Expr::Lit(Lit::Bool(Bool { value: false, .. })))
}

/// Walks an options object and collects its declarations.
pub(crate) struct OptionsClassifier<'a, 'd> {
    source: ScriptSource<'a>,
    diagnostics: &'d mut Diagnostics,
    script: InstanceScript,
}

impl<'a, 'd> OptionsClassifier<'a, 'd> {
    pub fn new(source: ScriptSource<'a>, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            source,
            diagnostics,
            script: InstanceScript::default(),
        }
    }

    pub fn classify(mut self, options: &ObjectLit) -> InstanceScript {
        for prop in &options.props {
            let Some(member) = self.member(prop, "default export") else {
                continue;
            };
            let entry = OptionsEntry::classify(member.name);
            tracing::trace!(key = member.name, ?entry, "options member");

            match entry {
                OptionsEntry::Name => {}
                OptionsEntry::Props => self.props(&member),
                OptionsEntry::Data => self.data(&member),
                OptionsEntry::Computed => self.computed(&member),
                OptionsEntry::Methods => self.methods(&member),
                OptionsEntry::Lifecycle(hook) => self.lifecycle(hook, &member),
                OptionsEntry::BeforeCreate => {
                    self.script.before_create = self.init_hook(&member);
                }
                OptionsEntry::Created => {
                    self.script.created = self.init_hook(&member);
                }
                OptionsEntry::Unrecognized(key) => self.warn(
                    DiagnosticCode::UnknownOption,
                    format!("in default export, `{}` is an unknown property, ignoring it", key),
                    member.span,
                ),
            }
        }
        self.script
    }

    fn warn(&mut self, code: DiagnosticCode, message: String, span: SwcSpan) {
        let span = self.source.file_span(span);
        self.diagnostics.warn_at(code, message, span);
    }

    /// Splits an object member into name and value. Spreads and
    /// non-identifier keys are reported and skipped.
    fn member<'n>(&mut self, prop: &'n PropOrSpread, context: &str) -> Option<Member<'n>> {
        let prop = match prop {
            PropOrSpread::Spread(spread) => {
                self.warn(
                    DiagnosticCode::UnexpectedMember,
                    format!(
                        "in {}, spread `{}` is not supported, ignoring it",
                        context,
                        self.source.text(spread.span())
                    ),
                    spread.span(),
                );
                return None;
            }
            PropOrSpread::Prop(prop) => prop.as_ref(),
        };

        let (key, value) = match prop {
            Prop::KeyValue(kv) => (&kv.key, MemberValue::Expr(&kv.value)),
            Prop::Method(method) => (
                &method.key,
                MemberValue::Method(FunctionMember::Method {
                    key: method.key.span(),
                    function: &method.function,
                }),
            ),
            Prop::Getter(getter) => (&getter.key, MemberValue::Accessor),
            Prop::Setter(setter) => (&setter.key, MemberValue::Accessor),
            Prop::Shorthand(ident) => {
                return Some(Member {
                    name: ident.sym.as_str(),
                    value: MemberValue::Shorthand,
                    span: ident.span,
                });
            }
            Prop::Assign(assign) => {
                return Some(Member {
                    name: assign.key.sym.as_str(),
                    value: MemberValue::Accessor,
                    span: assign.span(),
                });
            }
        };

        match key {
            PropName::Ident(ident) => Some(Member {
                name: ident.sym.as_str(),
                value,
                span: prop.span(),
            }),
            _ => {
                self.warn(
                    DiagnosticCode::NonIdentifierKey,
                    format!(
                        "in {}, `{}` is not an identifier, ignoring it",
                        context,
                        self.source.text(key.span())
                    ),
                    key.span(),
                );
                None
            }
        }
    }

    // === props ===

    fn props(&mut self, member: &Member<'_>) {
        let value = match member.value {
            MemberValue::Expr(expr) => unparen(expr),
            _ => {
                self.invalid_option("props", "neither an array nor an object", member.span);
                return;
            }
        };

        match value {
            Expr::Array(array) => {
                for element in array.elems.iter().flatten() {
                    let name = match (&element.spread, &*element.expr) {
                        (None, Expr::Lit(Lit::Str(name))) => name.value.as_str(),
                        _ => None,
                    };
                    match name {
                        Some(name) => self.script.props.push(format!("export let {};", name)),
                        None => {
                            let span = element.expr.span();
                            let text = self.source.text(span);
                            self.warn(
                                DiagnosticCode::UnexpectedProp,
                                format!("unexpected prop `{}`, ignoring it", text),
                                span,
                            );
                        }
                    }
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    if let Some(prop) = self.member(prop, "props") {
                        self.prop_declaration(&prop);
                    }
                }
            }
            _ => self.invalid_option("props", "neither an array nor an object", member.span),
        }
    }

    fn prop_declaration(&mut self, prop: &Member<'_>) {
        let value = match prop.value {
            MemberValue::Expr(expr) => unparen(expr),
            _ => {
                self.warn(
                    DiagnosticCode::UnexpectedProp,
                    format!("unexpected prop `{}` declaration, ignoring it", prop.name),
                    prop.span,
                );
                return;
            }
        };

        match value {
            Expr::Ident(ty) => {
                self.script
                    .props
                    .push(format!("export let {}; // {}", prop.name, ty.sym.as_str()));
            }
            Expr::Array(types) if types.elems.iter().flatten().all(|t| t.expr.is_ident()) => {
                let names: Vec<&str> = types
                    .elems
                    .iter()
                    .flatten()
                    .map(|t| self.source.text(t.expr.span()))
                    .collect();
                self.script
                    .props
                    .push(format!("export let {}; // {}", prop.name, names.join(" | ")));
            }
            Expr::Object(spec) => self.prop_from_spec(prop.name, spec),
            other => {
                let text = self.source.text(other.span());
                self.warn(
                    DiagnosticCode::UnexpectedProp,
                    format!(
                        "unexpected prop `{}` declaration: `{}`, ignoring it",
                        prop.name, text
                    ),
                    prop.span,
                );
            }
        }
    }

    /// `{ type, default, required, validator }`
    fn prop_from_spec(&mut self, name: &str, spec: &ObjectLit) {
        let mut ty: Option<&Expr> = None;
        let mut default: Option<MemberValue<'_>> = None;
        let mut required = false;
        let mut validator: Option<SwcSpan> = None;

        for field in spec.props.iter().filter_map(PropOrSpread::as_prop) {
            let field: &Prop = field;
            let (key, value) = match field {
                Prop::KeyValue(kv) => (&kv.key, MemberValue::Expr(&kv.value)),
                Prop::Method(method) => (
                    &method.key,
                    MemberValue::Method(FunctionMember::Method {
                        key: method.key.span(),
                        function: &method.function,
                    }),
                ),
                _ => continue,
            };
            let PropName::Ident(key) = key else {
                continue;
            };
            match (key.sym.as_str(), value) {
                ("type", MemberValue::Expr(expr)) => ty = Some(expr),
                ("default", value) => default = Some(value),
                ("required", MemberValue::Expr(expr)) => required = !is_false_literal(expr),
                ("validator", _) => validator = Some(field.span()),
                _ => {}
            }
        }

        let mut declaration = format!("export let {}", name);
        let mut notes: Vec<&str> = ty.map(|ty| self.source.text(ty.span())).into_iter().collect();
        if required {
            notes.push("required");
        }
        if let Some(default) = default {
            let (value, unwrapped) = self.default_value(default, ty);
            let _ = write!(declaration, " = {}", value);
            if unwrapped {
                notes.push("default unwrapped");
            }
        }
        declaration.push(';');
        if !notes.is_empty() {
            let _ = write!(declaration, " // {}", notes.join(", "));
        }
        if let Some(span) = validator {
            self.warn(
                DiagnosticCode::PropValidatorIgnored,
                format!("prop `{}` validator is ignored", name),
                span,
            );
        }
        self.script.props.push(declaration);
    }

    /// Text of a prop default, and whether a factory function was unwrapped
    /// to the value it returns. Factories are kept when the prop itself is a
    /// function.
    fn default_value(&mut self, default: MemberValue<'_>, ty: Option<&Expr>) -> (String, bool) {
        let function_typed =
            matches!(ty.map(unparen), Some(Expr::Ident(ident)) if ident.sym.as_str() == "Function");

        match default {
            MemberValue::Expr(expr) => {
                let factory = if function_typed { None } else { factory_result(expr) };
                let value = factory.unwrap_or(expr);
                (self.source.rewrite(value, self.diagnostics), factory.is_some())
            }
            MemberValue::Method(method) => {
                let returned = method.function().body.as_ref().and_then(single_return);
                match (returned, function_typed) {
                    (Some(value), false) => (self.source.rewrite(value, self.diagnostics), true),
                    _ => {
                        let Some(text) = self.source.rewrite_function(method, self.diagnostics)
                        else {
                            return ("undefined".to_string(), false);
                        };
                        if function_typed {
                            (text.arrow(), false)
                        } else {
                            (format!("({})()", text.arrow()), true)
                        }
                    }
                }
            }
            MemberValue::Shorthand | MemberValue::Accessor => ("undefined".to_string(), false),
        }
    }

    // === data ===

    fn data(&mut self, member: &Member<'_>) {
        let object = match data_shape(member) {
            DataShape::Object(object) => object,
            DataShape::TooComplex => {
                self.warn(
                    DiagnosticCode::DataTooComplex,
                    "in default export, `data` property contains too complex function, ignoring it"
                        .to_string(),
                    member.span,
                );
                return;
            }
            DataShape::Invalid => {
                self.invalid_option("data", "not an object expression", member.span);
                return;
            }
        };

        for prop in &object.props {
            let Some(field) = self.member(prop, "data") else {
                continue;
            };
            match field.value {
                MemberValue::Expr(value) => {
                    let value = self.source.rewrite(value, self.diagnostics);
                    self.script.data.push(format!("let {} = {};", field.name, value));
                }
                _ => self.warn(
                    DiagnosticCode::UnexpectedMember,
                    format!("unexpected `data` member `{}`, ignoring it", field.name),
                    field.span,
                ),
            }
        }
    }

    // === computed ===

    fn computed(&mut self, member: &Member<'_>) {
        let Some(object) = member.object() else {
            self.invalid_option("computed", "not an object expression", member.span);
            return;
        };

        for prop in &object.props {
            let Some(field) = self.member(prop, "computed") else {
                continue;
            };
            if let Some(function) = field.function() {
                self.computed_function(field.name, function);
                continue;
            }

            let reason = match field.value {
                MemberValue::Accessor => "getters and setters are not supported",
                MemberValue::Expr(expr) => match unparen(expr) {
                    Expr::Object(_) => "get/set pairs are not supported",
                    Expr::Arrow(_) => "arrow functions of the instance are not supported",
                    _ => "not a function",
                },
                _ => "not a function",
            };
            self.warn(
                DiagnosticCode::UnsupportedComputed,
                format!(
                    "unexpected computed `{}` declaration: {}, ignoring it",
                    field.name, reason
                ),
                field.span,
            );
        }
    }

    fn computed_function(&mut self, name: &str, function: FunctionMember<'_>) {
        let returned = function.function().body.as_ref().and_then(single_return);
        if let Some(value) = returned {
            let value = self.source.rewrite(value, self.diagnostics);
            self.script.computed.push(format!("$: {} = {};", name, value));
        } else if let Some(text) = self.source.rewrite_function(function, self.diagnostics) {
            self.script
                .computed
                .push(format!("$: {} = ({})();", name, text.arrow()));
        }
    }

    // === methods and hooks ===

    fn methods(&mut self, member: &Member<'_>) {
        let Some(object) = member.object() else {
            self.invalid_option("methods", "not an object expression", member.span);
            return;
        };

        for prop in &object.props {
            let Some(method) = self.member(prop, "methods") else {
                continue;
            };
            let Some(function) = method.function() else {
                self.warn(
                    DiagnosticCode::NotAFunction,
                    format!("in default export, method `{}` is not a function, ignoring it", method.name),
                    method.span,
                );
                continue;
            };
            if let Some(text) = self.source.rewrite_function(function, self.diagnostics) {
                self.script.methods.push(text.declaration(method.name));
            }
        }
    }

    fn lifecycle(&mut self, hook: LifecycleHook, member: &Member<'_>) {
        let Some(function) = self.hook_function(member) else {
            return;
        };
        let Some(text) = self.source.rewrite_function(function, self.diagnostics) else {
            return;
        };

        let name = hook.svelte_name();
        if !self.script.imports.contains(&name) {
            self.script.imports.push(name);
        }
        self.script.methods.push(format!("{}({});", name, text.arrow()));
    }

    /// Body statements of `beforeCreate` / `created`, one per line.
    fn init_hook(&mut self, member: &Member<'_>) -> Option<String> {
        let function = self.hook_function(member)?;
        let body = function.function().body.as_ref()?;
        let statements: Vec<String> = body
            .stmts
            .iter()
            .map(|stmt| self.source.rewrite(stmt, self.diagnostics))
            .collect();
        let code = statements.join("\n");
        (!code.is_empty()).then_some(code)
    }

    fn hook_function<'n>(&mut self, member: &Member<'n>) -> Option<FunctionMember<'n>> {
        let function = member.function();
        if function.is_none() {
            self.warn(
                DiagnosticCode::NotAFunction,
                format!("in default export, `{}` is not a function, ignoring it", member.name),
                member.span,
            );
        }
        function
    }

    fn invalid_option(&mut self, key: &str, problem: &str, span: SwcSpan) {
        self.warn(
            DiagnosticCode::InvalidOption,
            format!("in default export, `{}` property is {}, ignoring it", key, problem),
            span,
        );
    }
}

fn data_shape<'n>(member: &Member<'n>) -> DataShape<'n> {
    let returned = match member.value {
        MemberValue::Method(function) => function.function().body.as_ref().and_then(single_return),
        MemberValue::Expr(expr) => match unparen(expr) {
            Expr::Object(object) => return DataShape::Object(object),
            Expr::Fn(_) | Expr::Arrow(_) => factory_result(expr),
            _ => return DataShape::Invalid,
        },
        _ => return DataShape::Invalid,
    };
    match returned.map(unparen) {
        Some(Expr::Object(object)) => DataShape::Object(object),
        _ => DataShape::TooComplex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostic;
    use crate::script::parse_script;
    use pretty_assertions::assert_eq;
    use source_map::TextSize;

    fn classify(code: &str) -> (InstanceScript, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::default();
        let script = parse_script(code, ScriptLang::JavaScript, TextSize::from(0), &mut diagnostics)
            .expect("script parses");
        let object = script
            .module
            .body
            .iter()
            .find_map(|item| match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                    match unparen(&export.expr) {
                        Expr::Object(object) => Some(object.clone()),
                        _ => None,
                    }
                }
                _ => None,
            })
            .expect("default export object");
        let result = OptionsClassifier::new(script.source, &mut diagnostics).classify(&object);
        (result, diagnostics.into_vec())
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_classify_keys() {
        assert_eq!(OptionsEntry::classify("props"), OptionsEntry::Props);
        assert_eq!(
            OptionsEntry::classify("updated"),
            OptionsEntry::Lifecycle(LifecycleHook::Updated)
        );
        assert_eq!(
            OptionsEntry::classify("watch"),
            OptionsEntry::Unrecognized(SmolStr::new("watch"))
        );
        assert_eq!(LifecycleHook::Destroyed.svelte_name(), "onDestroy");
    }

    #[test]
    fn test_props_array() {
        let (script, diagnostics) = classify("export default { props: ['a', 'b', 1] }");
        assert_eq!(script.props, vec!["export let a;", "export let b;"]);
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::UnexpectedProp]);
    }

    #[test]
    fn test_props_object() {
        let (script, diagnostics) = classify(
            "export default { props: {
                title: String,
                size: [String, Number],
                count: { type: Number, default: 0, required: true },
                items: { type: Array, default: () => [] },
                onPick: { type: Function, default: () => {} },
                flag: { required: true },
                loose: { required: false },
                checked: { type: Boolean, validator: v => v },
            } }",
        );
        assert_eq!(
            script.props,
            vec![
                "export let title; // String",
                "export let size; // String | Number",
                "export let count = 0; // Number, required",
                "export let items = []; // Array, default unwrapped",
                "export let onPick = () => {}; // Function",
                "export let flag; // required",
                "export let loose;",
                "export let checked; // Boolean",
            ]
        );
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::PropValidatorIgnored]);
    }

    #[test]
    fn test_props_factory_defaults_are_noted() {
        let (script, diagnostics) = classify(
            "export default { props: {
                list: { type: Array, default() { return [this.first]; } },
                options: { default: function () { return {}; } },
                size: { type: Number, default: () => 1 },
            } }",
        );
        assert_eq!(
            script.props,
            vec![
                "export let list = [first]; // Array, default unwrapped",
                "export let options = {}; // default unwrapped",
                "export let size = 1; // Number, default unwrapped",
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_props_invalid() {
        let (script, diagnostics) = classify("export default { props: 'a' }");
        assert!(script.props.is_empty());
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::InvalidOption]);
    }

    #[test]
    fn test_data_forms() {
        for code in [
            "export default { data: { a: 1, b: this.x } }",
            "export default { data() { return { a: 1, b: this.x }; } }",
            "export default { data: function () { return { a: 1, b: this.x }; } }",
            "export default { data: () => ({ a: 1, b: this.x }) }",
        ] {
            let (script, diagnostics) = classify(code);
            assert_eq!(script.data, vec!["let a = 1;", "let b = x;"], "{}", code);
            assert!(diagnostics.is_empty(), "{}", code);
        }
    }

    #[test]
    fn test_data_too_complex() {
        let (script, diagnostics) =
            classify("export default { data() { const a = 1; return { a }; } }");
        assert!(script.data.is_empty());
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::DataTooComplex]);
    }

    #[test]
    fn test_computed() {
        let (script, diagnostics) = classify(
            "export default { computed: {
                full() { return this.first + ' ' + this.last; },
                total: function () { return this.a + this.b; },
                sorted() { const copy = [...this.items]; return copy.sort(); },
                both: { get() { return 1; }, set(v) {} },
                double: vm => vm.a * 2,
                get plain() { return 1; },
            } }",
        );
        assert_eq!(
            script.computed[..2],
            ["$: full = first + ' ' + last;", "$: total = a + b;"]
        );
        assert!(
            script.computed[2].starts_with("$: sorted = (() => {"),
            "{}",
            script.computed[2]
        );
        assert!(script.computed[2].ends_with("})();"));
        assert!(script.computed[2].contains("[...items]"));
        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::UnsupportedComputed; 3]
        );
    }

    #[test]
    fn test_methods() {
        let (script, diagnostics) = classify(
            "export default { methods: {
    inc(step = this.step) {
      this.count += step;
      setTimeout(function () { this.count = 0; }, 10);
    },
    async load() { this.items = await fetchItems(); },
    other: function (a) { return this.a + a; },
    notFn: 5,
} }",
        );
        assert_eq!(
            script.methods,
            vec![
                "function inc(step = step) {\n  count += step;\n  setTimeout(function () { this.count = 0; }, 10);\n}",
                "async function load() { items = await fetchItems(); }",
                "function other(a) { return a + a; }",
            ]
        );
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::NotAFunction]);
    }

    #[test]
    fn test_lifecycle_hooks() {
        let (script, diagnostics) = classify(
            "export default {
  mounted() { this.start(); },
  destroyed() { this.stop(); },
  updated: 3,
}",
        );
        assert_eq!(script.imports, vec!["onMount", "onDestroy"]);
        assert_eq!(
            script.methods,
            vec!["onMount(() => { start(); });", "onDestroy(() => { stop(); });"]
        );
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::NotAFunction]);
    }

    #[test]
    fn test_init_hooks() {
        let (script, _) = classify(
            "export default {
  created() {
    this.ready = true;
    this.load();
  },
  beforeCreate() {},
}",
        );
        assert_eq!(script.created.as_deref(), Some("ready = true;\nload();"));
        assert_eq!(script.before_create, None);
    }

    #[test]
    fn test_unknown_and_non_identifier_keys() {
        let (_, diagnostics) = classify(
            "export default { name: 'x', watch: {}, ['dyn']: 1, 'str': 2, ...mixin }",
        );
        assert_eq!(
            codes(&diagnostics),
            vec![
                DiagnosticCode::UnknownOption,
                DiagnosticCode::NonIdentifierKey,
                DiagnosticCode::NonIdentifierKey,
                DiagnosticCode::UnexpectedMember,
            ]
        );
    }

    #[test]
    fn test_render_layout() {
        let script = InstanceScript {
            imports: vec!["onMount"],
            props: vec!["export let a;".into()],
            data: vec!["let b = 1;".into()],
            computed: vec!["$: c = b * 2;".into()],
            before_create: None,
            created: Some("init();".into()),
            methods: vec!["function f() {}".into(), "onMount(() => {});".into()],
        };
        assert_eq!(
            script.render(ScriptLang::JavaScript),
            "<script>\nimport { onMount } from 'svelte';\nexport let a;\nlet b = 1;\n$: c = b * 2;\n\n// created:\ninit();\n\nfunction f() {}\n\nonMount(() => {});\n</script>\n\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            InstanceScript::default().render(ScriptLang::TypeScript),
            "<script lang=\"ts\">\n\n\n\n</script>\n\n"
        );
    }
}
