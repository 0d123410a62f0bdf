//! Source positions for vue2svelte.
//!
//! Parsers record [`Span`]s as byte offsets into the text they were given.
//! Template spans are relative to the `<template>` block content, so they are
//! shifted with [`Span::shift`] before being resolved against the whole file
//! through a [`LineIndex`].

mod line_index;
mod span;

pub use line_index::{LineIndex, Position};
pub use span::{ByteOffset, Span};
pub use text_size::{TextRange, TextSize};
