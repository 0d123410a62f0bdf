//! CLI errors, rendered by miette.

use camino::Utf8PathBuf;
use miette::{Diagnostic, NamedSource, SourceSpan};
use svelte_emitter::ConvertError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("unable to read {path}")]
    #[diagnostic(
        code(vue2svelte::read),
        help("check that the file exists and is readable")
    )]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write {path}")]
    #[diagnostic(code(vue2svelte::write))]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to convert {path}: {error}{details}")]
    #[diagnostic(code(vue2svelte::convert))]
    Convert {
        path: Utf8PathBuf,
        error: ConvertError,
        /// One line per underlying parse error.
        details: String,
        #[source_code]
        source_code: NamedSource<String>,
        #[label("here")]
        at: Option<SourceSpan>,
    },

    #[error("{count} warning(s) reported, no output written")]
    #[diagnostic(
        code(vue2svelte::warnings),
        help("rerun without --deny-warnings to write the partial conversion")
    )]
    DeniedWarnings { count: usize },
}
