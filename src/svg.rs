//! SVG and print-page output for a laid out label.
//!
//! Both documents are generated from a [`LabelLayout`] only, so an export
//! matches the on-screen preview element for element.

use std::fmt::Write as _;

use crate::constants::{BARCODE_TEXT_SIZE, MM_TO_PX};
use crate::layout::{line_height, Element, ElementKind, LabelLayout, Rect, TextAlign, TextStyle};

/// Renders the label as a standalone SVG document at its pixel size.
pub fn to_svg(layout: &LabelLayout) -> String {
    let mut out = String::new();
    let width = layout.width_px;
    let height = layout.height_px;

    // SVG header
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.2}\" height=\"{h:.2}\" viewBox=\"0 0 {w:.2} {h:.2}\">",
        w = width,
        h = height
    );

    // Clip regions: the label itself plus any element clip
    let mut clips: Vec<Rect> = Vec::new();
    for element in &layout.elements {
        if let Some(clip) = element.clip {
            if !clips.contains(&clip) {
                clips.push(clip);
            }
        }
    }
    let _ = writeln!(out, "<defs>");
    let _ = writeln!(
        out,
        "  <clipPath id=\"label\"><rect x=\"0\" y=\"0\" width=\"{width:.2}\" height=\"{height:.2}\" /></clipPath>"
    );
    for (i, clip) in clips.iter().enumerate() {
        let _ = writeln!(
            out,
            "  <clipPath id=\"clip{i}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" /></clipPath>",
            clip.x, clip.y, clip.w, clip.h
        );
    }
    let _ = writeln!(out, "</defs>");

    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"#ffffff\" />"
    );
    let _ = writeln!(
        out,
        "<g clip-path=\"url(#label)\" font-family=\"sans-serif\">"
    );
    for element in &layout.elements {
        let clip_index = element
            .clip
            .and_then(|clip| clips.iter().position(|c| *c == clip));
        if let Some(i) = clip_index {
            let _ = writeln!(out, "<g clip-path=\"url(#clip{i})\">");
            write_element(&mut out, element);
            let _ = writeln!(out, "</g>");
        } else {
            write_element(&mut out, element);
        }
    }
    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</svg>");
    out
}

/// Wraps the SVG in an HTML page sized for the printer, with zero margins.
pub fn print_document(layout: &LabelLayout, title: &str) -> String {
    let width_mm = layout.width_px / MM_TO_PX;
    let height_mm = layout.height_px / MM_TO_PX;
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", escape(title));
    let _ = writeln!(out, "<style>");
    let _ = writeln!(out, "@page {{ size: {width_mm:.2}mm {height_mm:.2}mm; margin: 0; }}");
    let _ = writeln!(out, "html, body {{ margin: 0; padding: 0; }}");
    let _ = writeln!(
        out,
        "svg {{ display: block; width: {width_mm:.2}mm; height: {height_mm:.2}mm; }}"
    );
    let _ = writeln!(out, "</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body onload=\"window.print()\">");
    out.push_str(&to_svg(layout));
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn write_element(out: &mut String, element: &Element) {
    let r = element.rect;
    match &element.kind {
        ElementKind::Text { lines, style, .. } => write_text(out, r, lines, style),
        ElementKind::Rule | ElementKind::Fill => {
            let _ = writeln!(
                out,
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#000000\" />",
                r.x, r.y, r.w, r.h
            );
        }
        ElementKind::Frame { stroke, dashed } => {
            let half = stroke / 2.0;
            let (stroke_color, dash) = if *dashed {
                ("#cbd5e1", " stroke-dasharray=\"3 2\"")
            } else {
                ("#000000", "")
            };
            let _ = writeln!(
                out,
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{stroke_color}\" stroke-width=\"{stroke:.2}\"{dash} />",
                r.x + half,
                r.y + half,
                (r.w - stroke).max(0.0),
                (r.h - stroke).max(0.0)
            );
        }
        ElementKind::Logo { source } => {
            let _ = writeln!(
                out,
                "<image href=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" preserveAspectRatio=\"xMidYMid meet\" />",
                escape(source),
                r.x,
                r.y,
                r.w,
                r.h
            );
        }
        ElementKind::LogoPlaceholder => {
            let _ = writeln!(
                out,
                "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"7\" fill=\"#94a3b8\" text-anchor=\"middle\" dominant-baseline=\"middle\">LOGO</text>",
                r.x + r.w / 2.0,
                r.y + r.h / 2.0
            );
        }
        ElementKind::QrCode { matrix, .. } => {
            if matrix.width == 0 {
                return;
            }
            let module = r.w / matrix.width as f32;
            let mut path = String::new();
            for y in 0..matrix.width {
                for x in 0..matrix.width {
                    if matrix.is_dark(x, y) {
                        let _ = write!(
                            path,
                            "M{:.3} {:.3}h{m:.3}v{m:.3}h-{m:.3}z",
                            r.x + x as f32 * module,
                            r.y + y as f32 * module,
                            m = module
                        );
                    }
                }
            }
            let _ = writeln!(out, "<path d=\"{path}\" fill=\"#000000\" />");
        }
        ElementKind::Barcode {
            payload,
            bars,
            module_width,
            bar_height,
        } => {
            let _ = writeln!(out, "<g fill=\"#000000\">");
            for (start, len) in bar_runs(bars) {
                let _ = writeln!(
                    out,
                    "  <rect x=\"{:.3}\" y=\"{:.2}\" width=\"{:.3}\" height=\"{:.2}\" />",
                    r.x + start as f32 * module_width,
                    r.y,
                    len as f32 * module_width,
                    bar_height
                );
            }
            let _ = writeln!(out, "</g>");
            let baseline = r.y + bar_height + line_height(BARCODE_TEXT_SIZE) * 0.85;
            let _ = writeln!(
                out,
                "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{BARCODE_TEXT_SIZE}\" text-anchor=\"middle\" fill=\"#000000\">{}</text>",
                r.x + r.w / 2.0,
                baseline,
                escape(payload)
            );
        }
    }
}

fn write_text(out: &mut String, r: Rect, lines: &[String], style: &TextStyle) {
    let lh = line_height(style.size);
    let (x, anchor) = match style.align {
        TextAlign::Left => (r.x, "start"),
        TextAlign::Center => (r.x + r.w / 2.0, "middle"),
        TextAlign::Right => (r.right(), "end"),
    };
    let family = if style.monospace { "monospace" } else { "sans-serif" };
    let italic = if style.italic { " font-style=\"italic\"" } else { "" };
    for (i, line) in lines.iter().enumerate() {
        let baseline = r.y + i as f32 * lh + (lh - style.size) / 2.0 + style.size * 0.85;
        let shown = if style.uppercase {
            line.to_uppercase()
        } else {
            line.clone()
        };
        let _ = writeln!(
            out,
            "<text x=\"{x:.2}\" y=\"{baseline:.2}\" font-size=\"{:.2}\" font-weight=\"{}\" font-family=\"{family}\"{italic} text-anchor=\"{anchor}\" fill=\"{}\">{}</text>",
            style.size,
            style.weight.css(),
            style.ink.hex(),
            escape(&shown)
        );
    }
}

/// Consecutive runs of bars as (first module, length).
pub(crate) fn bar_runs(bars: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, bar) in bars.iter().enumerate() {
        match (bar, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, bars.len() - s));
    }
    runs
}

/// Escapes text for use in XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render_label;
    use crate::types::{LabelConfig, LayoutStyle};

    #[test]
    fn test_svg_has_label_size_and_text() {
        let layout = render_label(&LabelConfig::default());
        let svg = to_svg(&layout);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"378.00\" height=\"567.00\""));
        assert!(svg.contains(">NOME DO SEU PRODUTO</text>"));
        assert!(svg.contains(">Valor Energético</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_escapes_text() {
        let config = LabelConfig {
            company_name: "Pães & Doces <Ltda>".into(),
            layout_style: LayoutStyle::Compact,
            ..LabelConfig::default()
        };
        let svg = to_svg(&render_label(&config));
        assert!(svg.contains("Pães &amp; Doces &lt;Ltda&gt;"));
        assert!(!svg.contains("<Ltda>"));
    }

    #[test]
    fn test_svg_omits_codes_for_blank_payloads() {
        let config = LabelConfig {
            qr_code: String::new(),
            barcode: String::new(),
            ..LabelConfig::default()
        };
        let svg = to_svg(&render_label(&config));
        assert!(!svg.contains("<path d=\"M"));
        assert!(!svg.contains(">7891234567890</text>"));

        let svg = to_svg(&render_label(&LabelConfig::default()));
        assert!(svg.contains("<path d=\"M"));
        assert!(svg.contains(">7891234567890</text>"));
    }

    #[test]
    fn test_clipped_rows_reference_a_clip_path() {
        let svg = to_svg(&render_label(&LabelConfig::default()));
        assert!(svg.contains("<clipPath id=\"clip0\">"));
        assert!(svg.contains("<g clip-path=\"url(#clip0)\">"));
    }

    #[test]
    fn test_print_document_sets_page_size() {
        let layout = render_label(&LabelConfig::default());
        let html = print_document(&layout, "Etiqueta");
        assert!(html.contains("@page { size: 100.00mm 150.00mm; margin: 0; }"));
        assert!(html.contains("<title>Etiqueta</title>"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_bar_runs() {
        let bars = [true, true, false, true, false, false, true];
        assert_eq!(bar_runs(&bars), vec![(0, 2), (3, 1), (6, 1)]);
        assert!(bar_runs(&[]).is_empty());
    }
}
