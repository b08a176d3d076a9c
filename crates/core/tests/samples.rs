//! Sample catalogue renders: every built-in label produces a canvas.

use labeldesk_core::{
    InputKind, InterpretOptions, Preview, PrimitiveKind, SAMPLE_LABELS, VisualTree, classify,
    preview, to_html,
};

fn render_sample(name: &str) -> labeldesk_core::Rendered {
    let sample = labeldesk_core::sample(name).unwrap_or_else(|| panic!("missing sample {name}"));
    match preview(sample.markup, &InterpretOptions::default()) {
        Preview::Label(r) => r,
        other => panic!("{name} did not preview as a label: {other:?}"),
    }
}

#[test]
fn every_sample_is_a_label_with_content() {
    for s in SAMPLE_LABELS {
        assert_eq!(classify(s.markup), InputKind::Label, "{}", s.name);
        let r = render_sample(s.name);
        assert!(r.info.element_count > 0, "{} rendered nothing", s.name);
        assert!(matches!(r.tree, VisualTree::Canvas { .. }));
        assert!(to_html(&r.tree).contains("label-element"));
    }
}

#[test]
fn simple_sample_info() {
    let r = render_sample("simple");
    assert_eq!(r.info.element_count, 2);
    assert_eq!(r.info.types[&PrimitiveKind::Text], 2);
}

#[test]
fn line_sample_has_three_rules() {
    let r = render_sample("line");
    assert_eq!(r.info.types[&PrimitiveKind::Line], 3);
    assert_eq!(r.info.types[&PrimitiveKind::Text], 2);
}

#[test]
fn warehouse_canvas_size() {
    // Frame: (15,10) 170x140 → (185,150). "A-12-03" at (25,50) size 40 → bottom 90.
    // Rule at (25,95) 140 wide → right 165. Texts at x=25 → right 125.
    let r = render_sample("warehouse");
    let VisualTree::Canvas { width, height, .. } = r.tree else {
        panic!("expected canvas");
    };
    assert_eq!(width, 200.0 + 40.0);
    assert_eq!(height, 150.0 + 40.0);
}

#[test]
fn product_sample_mix() {
    let r = render_sample("product");
    assert_eq!(r.info.types[&PrimitiveKind::Barcode], 1);
    // Four captions plus the barcode's own field data.
    assert_eq!(r.info.types[&PrimitiveKind::Text], 5);
    let json = serde_json::to_value(&r.info).unwrap();
    assert_eq!(json["elementCount"], 6);
}
