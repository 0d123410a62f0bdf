//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use serde::Serialize;
use source_map::LineIndex;
use svelte_emitter::{Diagnostic, Severity};

/// A formatted diagnostic for output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type (Error, Warning).
    #[serde(rename = "type")]
    pub diagnostic_type: &'static str,
    /// The file path.
    pub filename: String,
    /// The start position, when the diagnostic has a location.
    pub start: Option<Position>,
    /// The end position.
    pub end: Option<Position>,
    /// The message.
    pub message: String,
    /// The diagnostic code.
    pub code: &'static str,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

/// Formats diagnostics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a collection of diagnostics.
    pub fn format(&self, diagnostics: &[Diagnostic], file_path: &Utf8Path, source: &str) -> String {
        let formatted = Self::format_diagnostics(diagnostics, file_path, source);
        match self.format {
            OutputFormat::Human => Self::format_human(&formatted),
            OutputFormat::Json => serde_json::to_string_pretty(&formatted).unwrap_or_default(),
            OutputFormat::Machine => Self::format_machine(&formatted),
        }
    }

    /// Resolves spans to line/column positions.
    pub fn format_diagnostics(
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> Vec<FormattedDiagnostic> {
        let line_index = LineIndex::new(source);
        let position = |offset| {
            let pos = line_index.position(offset);
            Position {
                line: pos.line,
                column: pos.column,
                offset: u32::from(offset),
            }
        };

        diagnostics
            .iter()
            .map(|diag| FormattedDiagnostic {
                diagnostic_type: match diag.severity {
                    Severity::Error => "Error",
                    Severity::Warning => "Warning",
                },
                filename: file_path.to_string(),
                start: diag.span.map(|span| position(span.start)),
                end: diag.span.map(|span| position(span.end)),
                message: diag.message.clone(),
                code: diag.code.as_str(),
            })
            .collect()
    }

    fn format_human(diagnostics: &[FormattedDiagnostic]) -> String {
        let mut output = String::new();
        for diag in diagnostics {
            match &diag.start {
                Some(start) => output.push_str(&format!(
                    "{}:{}:{}\n",
                    diag.filename, start.line, start.column
                )),
                None => output.push_str(&format!("{}\n", diag.filename)),
            }
            output.push_str(&format!(
                "{}: {} ({})\n\n",
                diag.diagnostic_type, diag.message, diag.code
            ));
        }
        output
    }

    fn format_machine(diagnostics: &[FormattedDiagnostic]) -> String {
        let mut output = String::new();
        for diag in diagnostics {
            let location = match (&diag.start, &diag.end) {
                (Some(start), Some(end)) => format!(
                    "{}:{}:{}:{}:{}",
                    diag.filename, start.line, start.column, end.line, end.column
                ),
                _ => diag.filename.clone(),
            };
            output.push_str(&format!(
                "{} {} {} ({})\n",
                diag.diagnostic_type.to_uppercase(),
                location,
                diag.message,
                diag.code
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use source_map::Span;
    use svelte_emitter::DiagnosticCode;

    const SOURCE: &str = "<script>\nexport default { watch: {} }\n</script>";

    fn diagnostics() -> Vec<Diagnostic> {
        let start = SOURCE.find("watch").expect("watch key") as u32;
        vec![
            Diagnostic::new(DiagnosticCode::UnknownOption, "`watch` is an unknown property")
                .with_span(Span::new(start, start + 9)),
            Diagnostic::new(DiagnosticCode::UnsupportedStyleLang, "copied as is"),
        ]
    }

    #[test]
    fn test_format_human() {
        let formatter = Formatter::new(OutputFormat::Human);
        let output = formatter.format(&diagnostics(), Utf8Path::new("a.vue"), SOURCE);
        assert_eq!(
            output,
            "a.vue:2:18\nWarning: `watch` is an unknown property (unknown-option)\n\n\
             a.vue\nWarning: copied as is (unsupported-style-lang)\n\n"
        );
    }

    #[test]
    fn test_format_machine() {
        let formatter = Formatter::new(OutputFormat::Machine);
        let output = formatter.format(&diagnostics(), Utf8Path::new("a.vue"), SOURCE);
        let first = output.lines().next().expect("one line per diagnostic");
        assert_eq!(
            first,
            "WARNING a.vue:2:18:2:27 `watch` is an unknown property (unknown-option)"
        );
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_format_json() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format(&diagnostics(), Utf8Path::new("a.vue"), SOURCE);
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value[0]["code"], "unknown-option");
        assert_eq!(value[0]["start"]["line"], 2);
        assert_eq!(value[1]["start"], serde_json::Value::Null);
    }
}
