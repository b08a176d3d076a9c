//! Primitive renderer. Projects drawing primitives onto a visual tree.
//!
//! The renderer is a pure function of its input. Barcodes and QR codes are
//! drawn as placeholders of the right size, not as scannable symbols.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::markup::primitive::{Primitive, PrimitiveKind};

/// HTML emission for a [`VisualTree`].
pub mod html;

/// Message shown when the markup produced no primitives.
pub const NO_CONTENT_MESSAGE: &str = "No printable content detected";
/// Width assumed for primitives without an intrinsic width.
pub const FALLBACK_WIDTH: f64 = 100.0;
/// Height assumed for primitives without an intrinsic height.
pub const FALLBACK_HEIGHT: f64 = 30.0;
/// The canvas never shrinks below this width...
pub const MIN_CANVAS_WIDTH: f64 = 200.0;
/// ...or this height.
pub const MIN_CANVAS_HEIGHT: f64 = 150.0;
/// Margin added right and below the bounding box.
pub const CANVAS_PADDING: f64 = 40.0;
/// Caption printed under every barcode placeholder.
pub const BARCODE_CAPTION: &str = "1234567890";

/// The rendered label: either a positioned canvas or a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualTree {
    /// Nothing printable; show `message` instead of an empty canvas.
    Placeholder {
        /// Text for the placeholder.
        message: String,
    },
    /// An absolutely positioned canvas.
    Canvas {
        /// Canvas width including padding.
        width: f64,
        /// Canvas height including padding.
        height: f64,
        /// Elements in paint order.
        elements: Vec<VisualElement>,
    },
}

/// One absolutely positioned element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum VisualElement {
    /// A line of text.
    Text {
        /// Left offset.
        left: f64,
        /// Top offset.
        top: f64,
        /// CSS font size.
        font_size: f64,
        /// Unescaped text.
        text: String,
    },
    /// Bar strip plus caption.
    Barcode {
        /// Left offset.
        left: f64,
        /// Top offset.
        top: f64,
        /// Height of the bar strip.
        bar_height: f64,
        /// Caption under the bars.
        caption: String,
    },
    /// Square QR placeholder.
    QrPlaceholder {
        /// Left offset.
        left: f64,
        /// Top offset.
        top: f64,
        /// Side length.
        size: f64,
    },
    /// Bordered rectangle.
    Box {
        /// Left offset.
        left: f64,
        /// Top offset.
        top: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Border width.
        border_width: f64,
    },
    /// Filled rule.
    Line {
        /// Left offset.
        left: f64,
        /// Top offset.
        top: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
}

/// Element count and per-kind histogram of a render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewInfo {
    /// Total number of primitives.
    #[serde(rename = "elementCount")]
    pub element_count: usize,
    /// Occurrences per primitive kind.
    pub types: BTreeMap<PrimitiveKind, usize>,
}

/// Output of [`render`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// The visual tree.
    pub tree: VisualTree,
    /// Counts for the info panel.
    pub info: PreviewInfo,
}

/// Render primitives into a visual tree and a type histogram.
pub fn render(primitives: &[Primitive]) -> Rendered {
    Rendered {
        tree: build_tree(primitives),
        info: histogram(primitives),
    }
}

/// Count primitives per kind.
pub fn histogram(primitives: &[Primitive]) -> PreviewInfo {
    let mut types = BTreeMap::new();
    for p in primitives {
        *types.entry(p.kind()).or_insert(0) += 1;
    }
    PreviewInfo {
        element_count: primitives.len(),
        types,
    }
}

/// Bottom-right corner of everything drawn, grown from the minimum canvas.
pub fn bounding_box(primitives: &[Primitive]) -> (f64, f64) {
    primitives.iter().fold(
        (MIN_CANVAS_WIDTH, MIN_CANVAS_HEIGHT),
        |(max_x, max_y), p| {
            let (x, y) = p.origin();
            let (w, h) = p.extent();
            let right = x + positive_or(w, FALLBACK_WIDTH);
            let bottom = y + positive_or(h, FALLBACK_HEIGHT);
            (max_x.max(right), max_y.max(bottom))
        },
    )
}

fn build_tree(primitives: &[Primitive]) -> VisualTree {
    if primitives.is_empty() {
        return VisualTree::Placeholder {
            message: NO_CONTENT_MESSAGE.to_string(),
        };
    }
    let (max_x, max_y) = bounding_box(primitives);
    VisualTree::Canvas {
        width: max_x + CANVAS_PADDING,
        height: max_y + CANVAS_PADDING,
        elements: primitives.iter().map(element).collect(),
    }
}

fn element(p: &Primitive) -> VisualElement {
    match p {
        Primitive::Text {
            x,
            y,
            font_size,
            text,
        } => VisualElement::Text {
            left: *x,
            top: *y,
            font_size: *font_size,
            text: text.clone(),
        },
        Primitive::Barcode { x, y, height, .. } => VisualElement::Barcode {
            left: *x,
            top: *y,
            bar_height: *height,
            caption: BARCODE_CAPTION.to_string(),
        },
        Primitive::QrCode { x, y, size } => VisualElement::QrPlaceholder {
            left: *x,
            top: *y,
            size: *size,
        },
        Primitive::Box {
            x,
            y,
            width,
            height,
            thickness,
        } => VisualElement::Box {
            left: *x,
            top: *y,
            width: *width,
            height: *height,
            border_width: *thickness,
        },
        Primitive::Line {
            x,
            y,
            width,
            height,
            ..
        } => VisualElement::Line {
            left: *x,
            top: *y,
            width: *width,
            height: *height,
        },
    }
}

/// Zero-sized dimensions count as missing.
fn positive_or(v: Option<f64>, fallback: f64) -> f64 {
    match v {
        Some(v) if v > 0.0 => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::interpret::interpret_str;

    #[test]
    fn empty_renders_placeholder() {
        let r = render(&[]);
        assert_eq!(
            r.tree,
            VisualTree::Placeholder {
                message: NO_CONTENT_MESSAGE.into()
            }
        );
        assert_eq!(r.info.element_count, 0);
        assert!(r.info.types.is_empty());
    }

    #[test]
    fn small_label_uses_minimum_canvas() {
        let r = render(&interpret_str("^FO10,10^FDx^FS"));
        match r.tree {
            VisualTree::Canvas { width, height, .. } => {
                assert_eq!(width, MIN_CANVAS_WIDTH + CANVAS_PADDING);
                assert_eq!(height, MIN_CANVAS_HEIGHT + CANVAS_PADDING);
            }
            other => panic!("expected canvas, got {other:?}"),
        }
    }

    #[test]
    fn bounding_box_uses_own_size_or_fallback() {
        // Box at (25,25) 150x100 → right 175, bottom 125; text at (200,200)
        // has no width → 100 fallback, height = font size 15.
        let prims = interpret_str("^FO50,50^GB300,200,3^FS^FO400,400^A0N,30,30^FDx^FS");
        let (w, h) = bounding_box(&prims);
        assert_eq!(w, 300.0);
        assert_eq!(h, 215.0);
    }

    #[test]
    fn qr_code_is_as_tall_as_it_is_wide() {
        // Magnification 20 → 20 * 10 * 0.5 = 100 square, placed at y 150.
        let prims = interpret_str("^FO0,300^BQN,2,20");
        let (_, h) = bounding_box(&prims);
        assert_eq!(h, 250.0);
    }

    #[test]
    fn zero_width_line_falls_back() {
        // 0x0 box → horizontal line with width 0 → fallback width 100.
        let prims = interpret_str("^FO600,0^GB0,0,3");
        let (w, _) = bounding_box(&prims);
        assert_eq!(w, 300.0 + FALLBACK_WIDTH);
    }

    #[test]
    fn histogram_counts_kinds() {
        let prims = interpret_str("^FDa^FS^FDb^FS^BCN,10^GB1,100,1");
        let info = histogram(&prims);
        assert_eq!(info.element_count, 4);
        assert_eq!(info.types[&PrimitiveKind::Text], 2);
        assert_eq!(info.types[&PrimitiveKind::Barcode], 1);
        assert_eq!(info.types[&PrimitiveKind::Line], 1);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["elementCount"], 4);
        assert_eq!(json["types"]["text"], 2);
    }

    #[test]
    fn elements_keep_source_order() {
        let prims = interpret_str("^FO0,0^GB400,400,2^FS^FO0,0^FDover^FS");
        let Rendered { tree, .. } = render(&prims);
        let VisualTree::Canvas { elements, .. } = tree else {
            panic!("expected canvas");
        };
        assert!(matches!(elements[0], VisualElement::Box { .. }));
        assert!(matches!(elements[1], VisualElement::Text { .. }));
    }
}
