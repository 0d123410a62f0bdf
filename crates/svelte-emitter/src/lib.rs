//! Vue 2 to Svelte component conversion.
//!
//! This crate turns a parsed Vue single-file component into Svelte source.
//! It handles:
//! - Re-emitting the template tree as Svelte markup (`{#each}`, `{#if}`,
//!   `on:` handlers, `{@html}`)
//! - Translating the `export default { … }` options object into props,
//!   reactive declarations, functions and lifecycle calls
//! - Stripping `this.` from script code
//! - Making unscoped styles `:global` and rewriting deep selectors of scoped ones
//!
//! # Example
//!
//! ```
//! use svelte_emitter::{convert, ConvertOptions};
//!
//! let source = r#"
//! <template>
//!   <p @click="inc">{{ count }}</p>
//! </template>
//!
//! <script>
//! export default {
//!   data() {
//!     return { count: 0 };
//!   },
//!   methods: {
//!     inc() {
//!       this.count++;
//!     },
//!   },
//! };
//! </script>
//! "#;
//!
//! let output = convert(source, &ConvertOptions::default()).unwrap();
//! assert!(output.code.contains("let count = 0;"));
//! assert!(output.code.contains("function inc() {\n  count++;\n}"));
//! assert!(output.code.contains("<p on:click=\"{inc}\">"));
//! ```

mod assemble;
mod diagnostic;
mod error;
mod options;
mod script;
mod style;
mod template;

pub use assemble::{convert, ConvertOptions, ConvertOutput, OutputFragments};
pub use diagnostic::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use error::ConvertError;
pub use options::{InstanceScript, LifecycleHook, OptionsEntry};
pub use script::ScriptLang;
pub use style::{pretty_print, rewrite_deep, wrap_global};
