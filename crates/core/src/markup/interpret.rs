use super::args;
use super::lexer::{Opcode, Token, Tokens};
use super::primitive::{Orientation, Primitive, Symbology};
use crate::state::CursorState;

/// Display scale applied to every coordinate and size.
pub const DEFAULT_SCALE: f64 = 0.5;
/// Font size before any `^A0` (not scaled).
pub const DEFAULT_FONT_SIZE: f64 = 30.0;
/// Barcode height when `^BC` carries no height argument.
pub const BARCODE_FALLBACK_HEIGHT: f64 = 50.0;
/// QR size when `^BQ` carries no magnification argument.
pub const QR_FALLBACK_SIZE: f64 = 50.0;
/// Dots per unit of QR magnification.
pub const QR_UNIT: f64 = 10.0;
/// A scaled box dimension below this is drawn as a rule.
pub const LINE_THRESHOLD: f64 = 3.0;

/// Options for [`interpret_with_options`].
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretOptions {
    /// Display scale factor.
    pub scale: f64,
    /// Initial font size.
    pub default_font_size: f64,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            default_font_size: DEFAULT_FONT_SIZE,
        }
    }
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Interpret a token sequence with default options.
pub fn interpret<'a>(tokens: impl IntoIterator<Item = Token<'a>>) -> Vec<Primitive> {
    interpret_with_options(tokens, &InterpretOptions::default())
}

/// Tokenize and interpret a markup string with default options.
pub fn interpret_str(markup: &str) -> Vec<Primitive> {
    interpret(Tokens::new(markup))
}

/// Interpret a token sequence into drawing primitives.
///
/// Emission order is source order. Field-origin and font-select tokens only
/// update the cursor; unknown and malformed tokens are skipped. All state is
/// local to this call.
pub fn interpret_with_options<'a>(
    tokens: impl IntoIterator<Item = Token<'a>>,
    options: &InterpretOptions,
) -> Vec<Primitive> {
    let mut cursor = CursorState::new(options.scale, options.default_font_size);
    let mut out = Vec::new();

    for tok in tokens {
        let raw = tok.args();
        match tok.opcode {
            Opcode::FieldOrigin => cursor.apply_field_origin(raw),
            Opcode::FontSelect => cursor.apply_font(raw),
            Opcode::FieldData => out.extend(field_data(&cursor, raw)),
            Opcode::Barcode128 => out.push(barcode(&cursor, raw)),
            Opcode::QrCode => out.push(qr_code(&cursor, raw)),
            Opcode::GraphicBox => out.extend(graphic_box(&cursor, raw)),
            _ => {}
        }
    }

    out
}

// ─── Emitters ───────────────────────────────────────────────────────────────

fn field_data(cursor: &CursorState, raw: &str) -> Option<Primitive> {
    // The payload must be a non-empty single line.
    if raw.is_empty() || raw.contains(['\n', '\r']) {
        return None;
    }
    Some(Primitive::Text {
        x: cursor.x,
        y: cursor.y,
        font_size: cursor.font_size,
        text: raw.to_string(),
    })
}

fn barcode(cursor: &CursorState, raw: &str) -> Primitive {
    // ^BCo,h,...
    let height = args::upper(raw)
        .and_then(args::comma)
        .and_then(args::number)
        .map_or(BARCODE_FALLBACK_HEIGHT, |(h, _)| h * cursor.scale);
    Primitive::Barcode {
        x: cursor.x,
        y: cursor.y,
        height,
        symbology: Symbology::Code128,
    }
}

fn qr_code(cursor: &CursorState, raw: &str) -> Primitive {
    // ^BQo,model,magnification
    let size = args::upper(raw)
        .and_then(args::comma)
        .and_then(args::pair)
        .map_or(QR_FALLBACK_SIZE, |(_model, mag)| {
            mag * QR_UNIT * cursor.scale
        });
    Primitive::QrCode {
        x: cursor.x,
        y: cursor.y,
        size,
    }
}

fn graphic_box(cursor: &CursorState, raw: &str) -> Option<Primitive> {
    let (w, h, t) = args::triple(raw)?;
    let (width, height, thickness) = (w * cursor.scale, h * cursor.scale, t * cursor.scale);
    let (x, y) = (cursor.x, cursor.y);

    // Height is checked first: a 0x0 box is a horizontal rule.
    let prim = if height < LINE_THRESHOLD {
        Primitive::Line {
            x,
            y,
            width,
            height: thickness.max(1.0),
            orientation: Orientation::Horizontal,
        }
    } else if width < LINE_THRESHOLD {
        Primitive::Line {
            x,
            y,
            width: thickness.max(1.0),
            height,
            orientation: Orientation::Vertical,
        }
    } else {
        Primitive::Box {
            x,
            y,
            width,
            height,
            thickness,
        }
    };
    Some(prim)
}
