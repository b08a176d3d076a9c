/// Classification of a command token by its opcode prefix.
///
/// Recognition is case-sensitive and prefix-based: `^FO50,50` is a
/// [`Opcode::FieldOrigin`], `^fo50,50` is [`Opcode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Opcode {
    /// `^FO`: set the cursor position for the next field.
    FieldOrigin,
    /// `^A0`: select the scalable font and its size.
    FontSelect,
    /// `^FD`: field data (the printable payload).
    FieldData,
    /// `^FS`: field separator.
    FieldSeparator,
    /// `^BC`: Code 128 barcode.
    Barcode128,
    /// `^BQ`: QR code.
    QrCode,
    /// `^GB`: graphic box (also used for horizontal/vertical rules).
    GraphicBox,
    /// `^XA`: start of label format.
    StartFormat,
    /// `^XZ`: end of label format.
    EndFormat,
    /// Any other command. Preserved as a token, inert downstream.
    Other,
}

/// Opcode prefixes, checked in order against the trimmed token text.
const OPCODE_PREFIXES: &[(&str, Opcode)] = &[
    ("^FO", Opcode::FieldOrigin),
    ("^A0", Opcode::FontSelect),
    ("^FD", Opcode::FieldData),
    ("^FS", Opcode::FieldSeparator),
    ("^BC", Opcode::Barcode128),
    ("^BQ", Opcode::QrCode),
    ("^GB", Opcode::GraphicBox),
    ("^XA", Opcode::StartFormat),
    ("^XZ", Opcode::EndFormat),
];

impl Opcode {
    /// Classify a token's text by its opcode prefix.
    pub fn classify(text: &str) -> Self {
        OPCODE_PREFIXES
            .iter()
            .find(|(prefix, _)| text.starts_with(prefix))
            .map_or(Opcode::Other, |(_, op)| *op)
    }

    /// The literal prefix for a recognized opcode, `None` for [`Opcode::Other`].
    pub fn prefix(self) -> Option<&'static str> {
        OPCODE_PREFIXES
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(prefix, _)| *prefix)
    }
}

/// A command token that borrows its text directly from the source markup.
///
/// `text` is the trimmed command, leader included, e.g. `"^FO50,50"`.
/// `start`/`end` are byte offsets of `text` within the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The opcode this token was classified as.
    pub opcode: Opcode,
    /// Borrowed, trimmed slice of the source for this command.
    pub text: &'a str,
    /// Byte offset of the leader character.
    pub start: usize,
    /// Byte offset one past the last non-whitespace character.
    pub end: usize,
}

impl<'a> Token<'a> {
    /// The command code: the leader plus up to two command characters
    /// (`"^FO"`, `"~HS"`, `"^A0"`).
    pub fn code(&self) -> &'a str {
        match self.opcode.prefix() {
            Some(prefix) => &self.text[..prefix.len()],
            None => {
                let end = self
                    .text
                    .char_indices()
                    .nth(3)
                    .map_or(self.text.len(), |(i, _)| i);
                &self.text[..end]
            }
        }
    }

    /// Raw argument text following the command code.
    pub fn args(&self) -> &'a str {
        &self.text[self.code().len()..]
    }
}

/// Lazy iterator over the command tokens of a markup string.
///
/// A token starts at `^` followed by an ASCII letter or digit, or at `~`
/// followed by an ASCII letter, and runs up to (not including) the next `^`
/// or `~`. Trailing whitespace is trimmed. Text that does not start a command
/// (content before the first leader, a leader followed by punctuation) is
/// skipped.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    /// Start tokenizing `input` from the beginning.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let b = self.input.as_bytes();
        while self.pos < b.len() {
            let start = self.pos;
            self.pos += 1;
            if !starts_command(b, start) {
                continue;
            }
            // Leaders are ASCII, so every index we stop at is a char boundary.
            while self.pos < b.len() && !is_leader(b[self.pos]) {
                self.pos += 1;
            }
            let text = self.input[start..self.pos].trim_end();
            return Some(Token {
                opcode: Opcode::classify(text),
                text,
                start,
                end: start + text.len(),
            });
        }
        None
    }
}

/// Tokenize markup into an ordered vector of command tokens.
///
/// Every token borrows from `input`. Empty input yields an empty vector.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Tokens::new(input).collect()
}

fn is_leader(b: u8) -> bool {
    b == b'^' || b == b'~'
}

fn starts_command(b: &[u8], i: usize) -> bool {
    let Some(next) = b.get(i + 1) else {
        return false;
    };
    match b[i] {
        b'^' => next.is_ascii_alphanumeric(),
        b'~' => next.is_ascii_alphabetic(),
        _ => false,
    }
}
