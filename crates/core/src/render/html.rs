use std::fmt::Write as _;

use super::{Rendered, VisualElement, VisualTree};

/// Render a visual tree as a self-contained HTML fragment.
///
/// Positions are absolute pixels inside a relatively positioned container.
/// Field text is HTML-escaped.
pub fn to_html(tree: &VisualTree) -> String {
    let mut out = String::new();
    match tree {
        VisualTree::Placeholder { message } => {
            let _ = write!(
                out,
                r#"<div class="label-preview"><div class="empty-label">{}</div></div>"#,
                escape(message)
            );
        }
        VisualTree::Canvas {
            width,
            height,
            elements,
        } => {
            let _ = write!(
                out,
                r#"<div class="label-preview" style="position:relative;width:{width}px;height:{height}px;background:#fff;border:1px solid #ccc;">"#
            );
            for el in elements {
                out.push('\n');
                push_element(&mut out, el);
            }
            out.push_str("\n</div>");
        }
    }
    out
}

/// Render the tree and append the element count summary.
pub fn to_html_document(rendered: &Rendered) -> String {
    let mut out = to_html(&rendered.tree);
    let summary = rendered
        .info
        .types
        .iter()
        .map(|(kind, n)| format!("{kind}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(
        out,
        "\n<p class=\"preview-info\">Elements: {}",
        rendered.info.element_count
    );
    if !summary.is_empty() {
        let _ = write!(out, " ({summary})");
    }
    out.push_str("</p>");
    out
}

fn push_element(out: &mut String, el: &VisualElement) {
    let _ = match el {
        VisualElement::Text {
            left,
            top,
            font_size,
            text,
        } => write!(
            out,
            r#"<div class="label-element zpl-text" style="position:absolute;left:{left}px;top:{top}px;font-size:{font_size}px;font-family:monospace;">{}</div>"#,
            escape(text)
        ),
        VisualElement::Barcode {
            left,
            top,
            bar_height,
            caption,
        } => write!(
            out,
            r#"<div class="label-element zpl-barcode" style="position:absolute;left:{left}px;top:{top}px;"><div class="bars" style="height:{bar_height}px;"></div><div class="caption">{}</div></div>"#,
            escape(caption)
        ),
        VisualElement::QrPlaceholder { left, top, size } => write!(
            out,
            r#"<div class="label-element zpl-qrcode" style="position:absolute;left:{left}px;top:{top}px;width:{size}px;height:{size}px;border:1px solid #000;">QR</div>"#
        ),
        VisualElement::Box {
            left,
            top,
            width,
            height,
            border_width,
        } => write!(
            out,
            r#"<div class="label-element zpl-box" style="position:absolute;left:{left}px;top:{top}px;width:{width}px;height:{height}px;border:{border_width}px solid #000;box-sizing:border-box;"></div>"#
        ),
        VisualElement::Line {
            left,
            top,
            width,
            height,
        } => write!(
            out,
            r#"<div class="label-element zpl-line" style="position:absolute;left:{left}px;top:{top}px;width:{width}px;height:{height}px;background:#000;"></div>"#
        ),
    };
}

/// Escape the five HTML-significant characters.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::interpret::interpret_str;
    use crate::render::{BARCODE_CAPTION, NO_CONTENT_MESSAGE, render};

    #[test]
    fn placeholder_html() {
        let html = to_html(&render(&[]).tree);
        assert!(html.contains(NO_CONTENT_MESSAGE));
        assert!(html.contains("empty-label"));
    }

    #[test]
    fn text_is_escaped() {
        let r = render(&interpret_str("^FO0,0^FD<b>&\"x\"^FS"));
        let html = to_html(&r.tree);
        assert!(html.contains("&lt;b&gt;&amp;&quot;x&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn canvas_dimensions_and_positions() {
        let r = render(&interpret_str("^FO50,50^A0N,50,50^FDHello^FS"));
        let html = to_html(&r.tree);
        assert!(html.contains("width:240px;height:190px"));
        assert!(html.contains("left:25px;top:25px;font-size:25px"));
    }

    #[test]
    fn barcode_has_caption() {
        let html = to_html(&render(&interpret_str("^BCN,100")).tree);
        assert!(html.contains("height:50px"));
        assert!(html.contains(BARCODE_CAPTION));
    }

    #[test]
    fn document_summary() {
        let r = render(&interpret_str("^FDa^FS^FDb^FS"));
        let html = to_html_document(&r);
        assert!(html.contains("Elements: 2 (text: 2)"));
        let empty = to_html_document(&render(&[]));
        assert!(empty.ends_with("Elements: 0</p>"));
    }
}
