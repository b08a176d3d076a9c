//! Label markup core library.
//!
//! Tokenizes ZPL-style label markup, interprets the supported subset into
//! positioned drawing primitives, and renders those into an approximate
//! visual preview. The main entry points are [`tokenize`], [`interpret`],
//! [`render`] and the combined [`preview`] pipeline.
//!
//! Everything here is synchronous and allocation-light. No state survives
//! between calls, so previews can run concurrently without coordination.

#![warn(missing_docs)]

/// Markup: tokenizer, interpreter, and primitive types.
pub mod markup;
/// Classification and the end-to-end preview pipeline.
pub mod preview;
/// Visual tree construction and HTML emission.
pub mod render;
/// Built-in sample labels.
pub mod samples;
/// Interpreter cursor state.
pub mod state;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Tokenizer
pub use markup::lexer::{Opcode, Token, Tokens, tokenize};

// Interpreter
pub use markup::interpret::{InterpretOptions, interpret, interpret_str, interpret_with_options};
pub use markup::primitive::{Orientation, Primitive, PrimitiveKind, Symbology};

// Renderer
pub use render::html::{to_html, to_html_document};
pub use render::{PreviewInfo, Rendered, VisualElement, VisualTree, render};

// Pipeline
pub use preview::{InputKind, Preview, classify, preview};

// Samples
pub use samples::{SAMPLE_LABELS, SampleLabel, sample};

/// Serialize any preview value to a pretty-printed JSON string.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("preview types serialize infallibly")
}
