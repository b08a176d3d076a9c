//! Preview pipeline: classify, tokenize, interpret, render.

use serde::Serialize;

use crate::markup::interpret::{InterpretOptions, interpret_with_options};
use crate::markup::lexer::Tokens;
use crate::render::{Rendered, render};

/// Marker that opens a printable label format.
pub const START_OF_LABEL: &str = "^XA";

/// What kind of input the operator typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Empty after trimming.
    Blank,
    /// A printer status/config command with no label format (`~HS`, `^WD`, ...).
    ControlCommand,
    /// A label format.
    Label,
}

/// Classify raw input before previewing it.
pub fn classify(markup: &str) -> InputKind {
    let trimmed = markup.trim();
    if trimmed.is_empty() {
        InputKind::Blank
    } else if !trimmed.contains(START_OF_LABEL) {
        InputKind::ControlCommand
    } else {
        InputKind::Label
    }
}

/// Result of [`preview`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum Preview {
    /// Nothing to show.
    Blank,
    /// A control command; shown as a notice, not drawn.
    ControlCommand {
        /// The trimmed command text.
        command: String,
    },
    /// A rendered label.
    Label(Rendered),
}

impl Preview {
    /// The input classification that produced this preview.
    pub fn kind(&self) -> InputKind {
        match self {
            Preview::Blank => InputKind::Blank,
            Preview::ControlCommand { .. } => InputKind::ControlCommand,
            Preview::Label(_) => InputKind::Label,
        }
    }
}

/// Run the full preview pipeline on `markup`.
pub fn preview(markup: &str, options: &InterpretOptions) -> Preview {
    match classify(markup) {
        InputKind::Blank => Preview::Blank,
        InputKind::ControlCommand => Preview::ControlCommand {
            command: markup.trim().to_string(),
        },
        InputKind::Label => {
            let primitives = interpret_with_options(Tokens::new(markup), options);
            Preview::Label(render(&primitives))
        }
    }
}
