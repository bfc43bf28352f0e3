#![forbid(unsafe_code)]

//! Draw-primitive emission for inkpress.
//!
//! The [`Renderer`] merges an independently produced token stream with page
//! layouts: each placed line is mapped back to the tokens overlapping its
//! byte range, tokens are re-sliced at wrap and line boundaries, and every
//! visible slice becomes a [`TextRun`] at an absolute position. Escaping for
//! the downstream script format happens here and nowhere else.

pub mod escape;
pub mod primitive;
pub mod renderer;

pub use escape::{EscapeMode, Escaper, MarkupEscaper, NoEscape, QuotedEscaper};
pub use primitive::{DrawPrimitive, Outline, PagePrimitives, RunRole, TextRun};
pub use renderer::{RenderOptions, Renderer};
