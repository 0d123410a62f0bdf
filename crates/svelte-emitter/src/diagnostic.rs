//! Conversion warnings.
//!
//! Anything the converter cannot translate is reported here and skipped;
//! the rest of the component is still converted.

use source_map::Span;
use std::fmt;

/// A diagnostic produced while converting a component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// Location in the component source, when the offending construct has one.
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiagnosticCode {
    // === Options object ===
    /// `invalid-default-export`: the default export is not an options object
    InvalidDefaultExport,
    /// `non-identifier-key`: a computed or string key in the options object
    NonIdentifierKey,
    /// `unexpected-member`: a spread, getter or other non key/value member
    UnexpectedMember,
    /// `unknown-option`: an option key the converter does not handle
    UnknownOption,
    /// `invalid-option`: a known option with the wrong shape
    InvalidOption,
    /// `unexpected-prop`: a prop declaration of an unsupported shape
    UnexpectedProp,
    /// `prop-validator-ignored`: a prop `validator` function
    PropValidatorIgnored,
    /// `data-too-complex`: a `data` function that does more than return an object
    DataTooComplex,
    /// `unsupported-computed`: getter/setter pairs and other computed forms
    UnsupportedComputed,
    /// `not-a-function`: a method or hook that is not a function
    NotAFunction,

    // === Script ===
    /// `unknown-script-node`: a node the script rewriter cannot enter
    UnknownScriptNode,
    /// `recovered-script-error`: a syntax error the script parser recovered from
    RecoveredScriptError,

    // === Template ===
    /// `html-children-ignored`: children of an element with `v-html`
    HtmlChildrenIgnored,

    // === Style ===
    /// `unsupported-style-lang`: a `<style lang="…">` preprocessor block
    UnsupportedStyleLang,
    /// `unparsed-style`: a block the CSS parser rejects, copied as is
    UnparsedStyle,
}

impl DiagnosticCode {
    pub fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Returns the diagnostic code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::InvalidDefaultExport => "invalid-default-export",
            DiagnosticCode::NonIdentifierKey => "non-identifier-key",
            DiagnosticCode::UnexpectedMember => "unexpected-member",
            DiagnosticCode::UnknownOption => "unknown-option",
            DiagnosticCode::InvalidOption => "invalid-option",
            DiagnosticCode::UnexpectedProp => "unexpected-prop",
            DiagnosticCode::PropValidatorIgnored => "prop-validator-ignored",
            DiagnosticCode::DataTooComplex => "data-too-complex",
            DiagnosticCode::UnsupportedComputed => "unsupported-computed",
            DiagnosticCode::NotAFunction => "not-a-function",
            DiagnosticCode::UnknownScriptNode => "unknown-script-node",
            DiagnosticCode::RecoveredScriptError => "recovered-script-error",
            DiagnosticCode::HtmlChildrenIgnored => "html-children-ignored",
            DiagnosticCode::UnsupportedStyleLang => "unsupported-style-lang",
            DiagnosticCode::UnparsedStyle => "unparsed-style",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collects diagnostics in the order they are raised.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(code = %diagnostic.code, "{}", diagnostic.message);
        self.items.push(diagnostic);
    }

    /// Records a warning without a location.
    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Diagnostic::new(code, message));
    }

    /// Records a warning at `span`.
    pub fn warn_at(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.push(Diagnostic::new(code, message).with_span(span));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_kebab_case() {
        assert_eq!(DiagnosticCode::UnsupportedComputed.to_string(), "unsupported-computed");
        assert_eq!(DiagnosticCode::HtmlChildrenIgnored.as_str(), "html-children-ignored");
    }

    #[test]
    fn test_collector_keeps_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.warn(DiagnosticCode::UnknownOption, "first");
        diagnostics.warn_at(DiagnosticCode::NotAFunction, "second", Span::new(1u32, 2u32));
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(diagnostics.len(), 2);
        let items = diagnostics.into_vec();
        assert_eq!(items[1].span, Some(Span::new(1u32, 2u32)));
        assert_eq!(items[1].severity, Severity::Warning);
    }
}
