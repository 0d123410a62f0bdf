//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use svelte_emitter::ConvertOptions;

/// Converts a Vue 2 single-file component into a Svelte component.
#[derive(Debug, Parser)]
#[command(name = "vue2svelte")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The .vue file to convert
    pub input: Utf8PathBuf,

    /// Where to write the .svelte file (defaults to ./<input name>.svelte)
    pub output: Option<Utf8PathBuf>,

    /// Print the converted component instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Indentation unit for the template
    #[arg(long, default_value = "  ")]
    pub indent: String,

    /// Write `:value="value"` as `value="{value}"` instead of `{value}`
    #[arg(long = "no-shorthand")]
    pub no_shorthand: bool,

    /// Write bound attributes without quotes: `value={expr}`
    #[arg(long)]
    pub unquoted: bool,

    /// Keep HTML comments of the template
    #[arg(long)]
    pub comments: bool,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "human")]
    pub diagnostics: OutputFormat,

    /// Exit with error on warnings, without writing output
    #[arg(long = "deny-warnings")]
    pub deny_warnings: bool,

    /// Log conversion steps to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}

impl Args {
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            indent: self.indent.clone(),
            quote_bound_attributes: !self.unquoted,
            shorthand_bindings: !self.no_shorthand,
            template_comments: self.comments,
        }
    }

    /// The file to write: the explicit output path, or the input's file
    /// name with a `.svelte` extension in the current directory.
    pub fn output_path(&self) -> Utf8PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let stem = self.input.file_stem().unwrap_or("component");
                Utf8PathBuf::from(format!("{}.svelte", stem))
            }
        }
    }
}
