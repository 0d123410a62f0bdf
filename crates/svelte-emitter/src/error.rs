//! Fatal conversion errors.

use source_map::Span;
use thiserror::Error;
use vue_parser::ParseError;

/// An error that stops the conversion. No output is produced.
///
/// All spans are byte ranges in the component source.
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    #[error("unable to split component into blocks")]
    Component { errors: Vec<ParseError> },

    #[error("{} error(s) while parsing template", errors.len())]
    Template { errors: Vec<ParseError> },

    #[error("unable to parse script: {message}")]
    Script { message: String, span: Span },

    #[error("unable to parse script: multiple `export default` declarations")]
    MultipleDefaultExports { span: Span },
}

impl ConvertError {
    /// The individual parse errors behind a component or template failure.
    pub fn parse_errors(&self) -> &[ParseError] {
        match self {
            ConvertError::Component { errors } | ConvertError::Template { errors } => errors,
            _ => &[],
        }
    }

    /// Primary location of the error, if there is a single one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ConvertError::Component { errors } | ConvertError::Template { errors } => {
                errors.first().map(|e| e.span)
            }
            ConvertError::Script { span, .. }
            | ConvertError::MultipleDefaultExports { span } => Some(*span),
        }
    }
}
