//! Runs one conversion: read, convert, report, write.

use crate::cli::Args;
use crate::error::CliError;
use crate::output::Formatter;
use miette::{NamedSource, SourceSpan};
use source_map::LineIndex;
use std::fmt::Write;
use svelte_emitter::{convert, ConvertError};

/// Converts `args.input` and writes the result.
pub fn run(args: &Args) -> Result<(), CliError> {
    let source = std::fs::read_to_string(&args.input).map_err(|source| CliError::Read {
        path: args.input.clone(),
        source,
    })?;
    tracing::debug!(path = %args.input, bytes = source.len(), "read component");

    let output = match convert(&source, &args.convert_options()) {
        Ok(output) => output,
        Err(error) => return Err(conversion_failed(args, source, error)),
    };

    if !output.diagnostics.is_empty() {
        let formatter = Formatter::new(args.diagnostics);
        eprint!("{}", formatter.format(&output.diagnostics, &args.input, &source));
        if args.deny_warnings {
            return Err(CliError::DeniedWarnings {
                count: output.diagnostics.len(),
            });
        }
    }

    if args.stdout {
        print!("{}", output.code);
        return Ok(());
    }

    let output_path = args.output_path();
    std::fs::write(&output_path, &output.code).map_err(|source| CliError::Write {
        path: output_path.clone(),
        source,
    })?;
    println!(
        "Successfully converted {} to {}. Please note that some manual corrections are probably still required.",
        args.input, output_path
    );
    Ok(())
}

fn conversion_failed(args: &Args, source: String, error: ConvertError) -> CliError {
    let line_index = LineIndex::new(&source);
    let mut details = String::new();
    for parse_error in error.parse_errors() {
        let _ = write!(
            details,
            "\n  {}:{}: {}",
            args.input,
            line_index.position(parse_error.span.start),
            parse_error
        );
    }
    let at = error.span().map(|span| {
        SourceSpan::from((usize::from(span.start), usize::from(span.len())))
    });

    CliError::Convert {
        path: args.input.clone(),
        error,
        details,
        source_code: NamedSource::new(args.input.as_str(), source),
        at,
    }
}
