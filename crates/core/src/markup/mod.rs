/// Command tokenizer: splits markup into borrowed command tokens.
pub mod lexer;
/// Markup interpreter: turns tokens into drawing primitives.
pub mod interpret;
/// Drawing primitive types.
pub mod primitive;

pub(crate) mod args;
