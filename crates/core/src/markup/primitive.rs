use serde::{Deserialize, Serialize};

/// Orientation of a rule drawn with a degenerate graphic box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Rule running along the x axis.
    Horizontal,
    /// Rule running along the y axis.
    Vertical,
}

/// Barcode symbology of a [`Primitive::Barcode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Symbology {
    /// Code 128 (`^BC`).
    Code128,
}

/// One positioned drawing unit produced by the interpreter.
///
/// Coordinates and sizes are already multiplied by the display scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    /// A text run from `^FD`.
    Text {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Font size in effect when the field was emitted.
        #[serde(rename = "fontSize")]
        font_size: f64,
        /// Field data payload.
        text: String,
    },
    /// A barcode placeholder from `^BC`.
    Barcode {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Bar height.
        height: f64,
        /// Barcode family.
        symbology: Symbology,
    },
    /// A QR code placeholder from `^BQ`.
    #[serde(rename = "qrcode")]
    QrCode {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Side length of the square symbol.
        size: f64,
    },
    /// A bordered rectangle from `^GB`.
    Box {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Outer width.
        width: f64,
        /// Outer height.
        height: f64,
        /// Border thickness.
        thickness: f64,
    },
    /// A rule from a `^GB` with a degenerate width or height.
    Line {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Horizontal extent (line weight for vertical rules).
        width: f64,
        /// Vertical extent (line weight for horizontal rules).
        height: f64,
        /// Which axis the rule runs along.
        orientation: Orientation,
    },
}

/// The tag of a [`Primitive`], used as the histogram key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// [`Primitive::Text`].
    Text,
    /// [`Primitive::Barcode`].
    Barcode,
    /// [`Primitive::QrCode`].
    #[serde(rename = "qrcode")]
    QrCode,
    /// [`Primitive::Box`].
    Box,
    /// [`Primitive::Line`].
    Line,
}

impl PrimitiveKind {
    /// Wire name of this kind (`"text"`, `"qrcode"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Text => "text",
            PrimitiveKind::Barcode => "barcode",
            PrimitiveKind::QrCode => "qrcode",
            PrimitiveKind::Box => "box",
            PrimitiveKind::Line => "line",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Primitive {
    /// The variant tag.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Text { .. } => PrimitiveKind::Text,
            Primitive::Barcode { .. } => PrimitiveKind::Barcode,
            Primitive::QrCode { .. } => PrimitiveKind::QrCode,
            Primitive::Box { .. } => PrimitiveKind::Box,
            Primitive::Line { .. } => PrimitiveKind::Line,
        }
    }

    /// Top-left corner `(x, y)`.
    pub fn origin(&self) -> (f64, f64) {
        match *self {
            Primitive::Text { x, y, .. }
            | Primitive::Barcode { x, y, .. }
            | Primitive::QrCode { x, y, .. }
            | Primitive::Box { x, y, .. }
            | Primitive::Line { x, y, .. } => (x, y),
        }
    }

    /// The primitive's own `(width, height)`, where it has one.
    ///
    /// Text has no intrinsic width (only a line height) and a barcode's
    /// visual width does not depend on its data, so both report `None` for
    /// width. A QR code is square: its size is both width and height.
    pub fn extent(&self) -> (Option<f64>, Option<f64>) {
        match *self {
            Primitive::Text { font_size, .. } => (None, Some(font_size)),
            Primitive::Barcode { height, .. } => (None, Some(height)),
            Primitive::QrCode { size, .. } => (Some(size), Some(size)),
            Primitive::Box { width, height, .. } | Primitive::Line { width, height, .. } => {
                (Some(width), Some(height))
            }
        }
    }
}
