//! Component conversion entry point.

use crate::diagnostic::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::error::ConvertError;
use crate::options::OptionsClassifier;
use crate::script::{parse_script, ScriptLang};
use crate::style::convert_style;
use crate::template::TemplateEmitter;
use swc_common::Spanned;
use swc_ecma_ast::{Expr, ModuleDecl, ModuleItem, ObjectLit};
use vue_parser::{parse_sfc, parse_template, ParseError, SfcBlock, TemplateParseOptions};

/// Options controlling the generated markup.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// One level of template indentation.
    pub indent: String,
    /// Write bound attributes as `key="{expr}"` rather than `key={expr}`.
    pub quote_bound_attributes: bool,
    /// Write `:key="key"` as `{key}`.
    pub shorthand_bindings: bool,
    /// Keep HTML comments of the template.
    pub template_comments: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            quote_bound_attributes: true,
            shorthand_bindings: true,
            template_comments: false,
        }
    }
}

/// A converted component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConvertOutput {
    /// The Svelte component source.
    pub code: String,
    /// Everything that was skipped or only partially converted.
    pub diagnostics: Vec<Diagnostic>,
}

/// The pieces of a Svelte component, concatenated in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputFragments {
    pub module_script: Option<String>,
    pub instance_script: Option<String>,
    pub styles: Vec<String>,
    pub template: Option<String>,
}

impl OutputFragments {
    pub fn assemble(&self) -> String {
        let mut code = String::new();
        code.extend(self.module_script.as_deref());
        code.extend(self.instance_script.as_deref());
        code.extend(self.styles.iter().map(String::as_str));
        code.extend(self.template.as_deref());
        code
    }
}

/// Converts a Vue 2 single-file component into a Svelte component.
///
/// Constructs that cannot be translated are skipped and reported in
/// [`ConvertOutput::diagnostics`]. Parse failures of any block abort the
/// conversion.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<ConvertOutput, ConvertError> {
    let sfc = parse_sfc(source);
    if !sfc.errors.is_empty() {
        return Err(ConvertError::Component { errors: sfc.errors });
    }
    let descriptor = sfc.descriptor;

    let mut diagnostics = Diagnostics::default();
    let mut fragments = OutputFragments::default();

    if let Some(script) = &descriptor.script {
        convert_script(script, &mut fragments, &mut diagnostics)?;
    }
    for style in &descriptor.styles {
        fragments.styles.push(convert_style(style, &mut diagnostics));
    }
    if let Some(template) = &descriptor.template {
        fragments.template = convert_template(template, options, &mut diagnostics)?;
    }

    tracing::debug!(
        module_script = fragments.module_script.is_some(),
        instance_script = fragments.instance_script.is_some(),
        styles = fragments.styles.len(),
        diagnostics = diagnostics.len(),
        "converted component"
    );

    Ok(ConvertOutput {
        code: fragments.assemble(),
        diagnostics: diagnostics.into_vec(),
    })
}

fn convert_script(
    block: &SfcBlock,
    fragments: &mut OutputFragments,
    diagnostics: &mut Diagnostics,
) -> Result<(), ConvertError> {
    let lang = ScriptLang::from_attr(block.lang());
    let script = parse_script(&block.content, lang, block.content_span.start, diagnostics)?;
    let source = script.source;

    let mut default_export: Option<&ModuleItem> = None;
    for item in &script.module.body {
        if matches!(
            item,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(_) | ModuleDecl::ExportDefaultDecl(_))
        ) {
            if default_export.is_some() {
                return Err(ConvertError::MultipleDefaultExports {
                    span: source.file_span(item.span()),
                });
            }
            default_export = Some(item);
        }
    }

    let other_items = script.module.body.len() - usize::from(default_export.is_some());
    if other_items > 0 {
        let removals: Vec<_> = default_export
            .map(|item| source.range(item.span()))
            .into_iter()
            .collect();
        let code = source.print_without(&removals);
        let open = match lang {
            ScriptLang::TypeScript => "<script context=\"module\" lang=\"ts\">",
            ScriptLang::JavaScript => "<script context=\"module\">",
        };
        fragments.module_script = Some(format!("{}\n{}\n</script>\n\n", open, code.trim()));
    }

    let Some(item) = default_export else {
        return Ok(());
    };
    match options_object(item) {
        Some(object) => {
            let instance = OptionsClassifier::new(source, diagnostics).classify(object);
            fragments.instance_script = Some(instance.render(lang));
        }
        None => diagnostics.warn_at(
            DiagnosticCode::InvalidDefaultExport,
            "default export is not an options object, ignoring it",
            source.file_span(item.span()),
        ),
    }
    Ok(())
}

/// The options object of `export default {…}`, also looking through
/// parentheses, type assertions and `defineComponent({…})`-style calls.
fn options_object(item: &ModuleItem) -> Option<&ObjectLit> {
    let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) = item else {
        return None;
    };
    let mut expr: &Expr = &export.expr;
    loop {
        expr = match expr {
            Expr::Object(object) => return Some(object),
            Expr::Paren(paren) => &*paren.expr,
            Expr::TsAs(as_expr) => &*as_expr.expr,
            Expr::TsSatisfies(satisfies) => &*satisfies.expr,
            Expr::TsConstAssertion(assertion) => &*assertion.expr,
            Expr::Call(call) => match call.args.as_slice() {
                [arg] if arg.spread.is_none() => &*arg.expr,
                _ => return None,
            },
            _ => return None,
        };
    }
}

fn convert_template(
    block: &SfcBlock,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Option<String>, ConvertError> {
    let base = block.content_span.start;
    let result = parse_template(
        &block.content,
        TemplateParseOptions {
            comments: options.template_comments,
        },
    );
    if !result.errors.is_empty() {
        let errors = result
            .errors
            .into_iter()
            .map(|error| ParseError {
                span: error.span.shift(base),
                ..error
            })
            .collect();
        return Err(ConvertError::Template { errors });
    }

    Ok(result.root.map(|root| {
        let mut emitter = TemplateEmitter::new(options, diagnostics, base);
        emitter.element(&root, 0);
        emitter.finish()
    }))
}
