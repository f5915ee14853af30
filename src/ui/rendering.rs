//! Live preview: paints the label's display list with egui.
//!
//! Coordinates from the layout are label pixels; everything is mapped
//! through one scale so the preview matches the exports.

use eframe::egui;
use eframe::epaint::StrokeKind;

use super::file_ops::decode_data_uri;
use super::state::LabelDesignerApp;
use crate::constants::BARCODE_TEXT_SIZE;
use crate::layout::{line_height, render_label, Element, ElementKind, FontWeight, Ink, LabelLayout, Rect, TextAlign, TextStyle};
use crate::svg::bar_runs;

/// Maps label pixels to screen points.
#[derive(Debug, Clone, Copy)]
struct Mapping {
    origin: egui::Pos2,
    scale: f32,
}

impl Mapping {
    fn rect(&self, r: Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.origin + egui::vec2(r.x, r.y) * self.scale,
            egui::vec2(r.w, r.h) * self.scale,
        )
    }

    fn pos(&self, x: f32, y: f32) -> egui::Pos2 {
        self.origin + egui::vec2(x, y) * self.scale
    }
}

fn ink_color(ink: Ink) -> egui::Color32 {
    match ink {
        Ink::Black => egui::Color32::BLACK,
        Ink::White => egui::Color32::WHITE,
        Ink::Muted => egui::Color32::from_rgb(100, 116, 139),
    }
}

/// Largest scale at which a `width` x `height` label fits in `available`, never above 2x.
pub(crate) fn fit_scale(width: f32, height: f32, available: egui::Vec2) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (available.x / width).min(available.y / height).clamp(0.1, 2.0)
}

/// Decodes a logo source into an image egui can upload.
fn decode_logo(source: &str) -> Option<egui::ColorImage> {
    let bytes = decode_data_uri(source)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|err| log::warn!("Logo could not be decoded: {err}"))
        .ok()?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

impl LabelDesignerApp {
    /// Texture of the configured logo, decoded once per logo source.
    ///
    /// Only `data:` URIs are drawn; remote URLs show the frame without an image.
    fn logo_texture(&mut self, ctx: &egui::Context, source: &str) -> Option<egui::TextureHandle> {
        if self.logo.source != source {
            self.logo.source = source.to_string();
            self.logo.texture = decode_logo(source)
                .map(|image| ctx.load_texture("label-logo", image, egui::TextureOptions::LINEAR));
        }
        self.logo.texture.clone()
    }

    /// Draws the live preview filling the available space.
    pub(crate) fn draw_preview(&mut self, ui: &mut egui::Ui) {
        let layout = render_label(&self.config);

        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Visualização Real-Time").strong());
        });
        ui.add_space(8.0);

        let hint_height = 40.0;
        let mut available = ui.available_size();
        available.y = (available.y - hint_height).max(1.0);
        let scale = fit_scale(layout.width_px, layout.height_px, available - egui::vec2(32.0, 32.0));
        let size = egui::vec2(layout.width_px, layout.height_px) * scale;

        let (area, _) = ui.allocate_exact_size(available, egui::Sense::hover());
        let paper = egui::Rect::from_center_size(area.center(), size);
        let mapping = Mapping {
            origin: paper.min,
            scale,
        };

        let painter = ui.painter_at(area);
        painter.rect_filled(
            paper.translate(egui::vec2(3.0, 4.0)),
            2.0,
            egui::Color32::from_black_alpha(40),
        );
        painter.rect_filled(paper, 0.0, egui::Color32::WHITE);

        let logo = match layout.elements.iter().find_map(|element| match &element.kind {
            ElementKind::Logo { source } => Some(source.clone()),
            _ => None,
        }) {
            Some(source) => self.logo_texture(ui.ctx(), &source),
            None => None,
        };
        paint_layout(&painter.with_clip_rect(paper), &layout, mapping, logo.as_ref());

        ui.add_space(4.0);
        ui.vertical_centered(|ui| {
            ui.weak(format!(
                "Impressora: {:.0}x{:.0}mm. Papel Contínuo ou GAP. Desative as margens no diálogo do navegador antes de imprimir.",
                self.config.width, self.config.height
            ));
        });
    }
}

/// Paints every element of `layout` in order.
fn paint_layout(painter: &egui::Painter, layout: &LabelLayout, mapping: Mapping, logo: Option<&egui::TextureHandle>) {
    for element in &layout.elements {
        match element.clip {
            Some(clip) => {
                let clipped = painter.with_clip_rect(mapping.rect(clip).intersect(painter.clip_rect()));
                paint_element(&clipped, element, mapping, logo);
            }
            None => paint_element(painter, element, mapping, logo),
        }
    }
}

fn paint_element(painter: &egui::Painter, element: &Element, mapping: Mapping, logo: Option<&egui::TextureHandle>) {
    let rect = mapping.rect(element.rect);
    let scale = mapping.scale;
    match &element.kind {
        ElementKind::Text { lines, style, .. } => paint_text(painter, element.rect, lines, style, mapping),
        ElementKind::Rule | ElementKind::Fill => {
            painter.rect_filled(rect, 0.0, egui::Color32::BLACK);
        }
        ElementKind::Frame { stroke, dashed: false } => {
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(stroke * scale, egui::Color32::BLACK),
                StrokeKind::Inside,
            );
        }
        ElementKind::Frame { stroke, dashed: true } => {
            let color = egui::Color32::from_rgb(203, 213, 225);
            let points = [
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
                rect.left_top(),
            ];
            painter.extend(egui::Shape::dashed_line(
                &points,
                egui::Stroke::new(stroke * scale, color),
                3.0 * scale,
                2.0 * scale,
            ));
        }
        ElementKind::Logo { .. } => match logo {
            Some(texture) => {
                let fitted = fit_inside(rect, texture.size_vec2());
                painter.image(
                    texture.id(),
                    fitted,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                painter.rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(203, 213, 225)),
                    StrokeKind::Inside,
                );
            }
        },
        ElementKind::LogoPlaceholder => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "LOGO",
                egui::FontId::proportional(7.0 * scale),
                egui::Color32::from_rgb(148, 163, 184),
            );
        }
        ElementKind::QrCode { matrix, .. } => {
            if matrix.width == 0 {
                return;
            }
            let module = element.rect.w / matrix.width as f32;
            for y in 0..matrix.width {
                for x in 0..matrix.width {
                    if matrix.is_dark(x, y) {
                        let cell = Rect::new(
                            element.rect.x + x as f32 * module,
                            element.rect.y + y as f32 * module,
                            module,
                            module,
                        );
                        painter.rect_filled(mapping.rect(cell), 0.0, egui::Color32::BLACK);
                    }
                }
            }
        }
        ElementKind::Barcode {
            payload,
            bars,
            module_width,
            bar_height,
        } => {
            let r = element.rect;
            for (start, len) in bar_runs(bars) {
                let bar = Rect::new(r.x + start as f32 * module_width, r.y, len as f32 * module_width, *bar_height);
                painter.rect_filled(mapping.rect(bar), 0.0, egui::Color32::BLACK);
            }
            painter.text(
                mapping.pos(r.x + r.w / 2.0, r.y + bar_height),
                egui::Align2::CENTER_TOP,
                payload,
                egui::FontId::monospace(BARCODE_TEXT_SIZE * scale),
                egui::Color32::BLACK,
            );
        }
    }
}

fn paint_text(painter: &egui::Painter, r: Rect, lines: &[String], style: &TextStyle, mapping: Mapping) {
    let lh = line_height(style.size);
    let font = if style.monospace {
        egui::FontId::monospace(style.size * mapping.scale)
    } else {
        egui::FontId::proportional(style.size * mapping.scale)
    };
    let color = ink_color(style.ink);
    let (x, anchor) = match style.align {
        TextAlign::Left => (r.x, egui::Align::LEFT),
        TextAlign::Center => (r.x + r.w / 2.0, egui::Align::Center),
        TextAlign::Right => (r.right(), egui::Align::RIGHT),
    };

    for (i, line) in lines.iter().enumerate() {
        let shown = if style.uppercase {
            line.to_uppercase()
        } else {
            line.clone()
        };
        let mut job = egui::text::LayoutJob::single_section(
            shown,
            egui::TextFormat {
                font_id: font.clone(),
                color,
                italics: style.italic,
                ..Default::default()
            },
        );
        job.halign = anchor;
        let galley = painter.layout_job(job);

        let top = r.y + i as f32 * lh + (lh - style.size) / 2.0;
        let pos = mapping.pos(x, top);
        painter.galley(pos, galley.clone(), color);
        // egui ships a single weight; heavier text is drawn twice, slightly offset.
        if matches!(style.weight, FontWeight::Bold | FontWeight::Black) {
            let offset = if style.weight == FontWeight::Black { 0.6 } else { 0.35 };
            painter.galley(pos + egui::vec2(offset * mapping.scale, 0.0), galley, color);
        }
    }
}

/// Largest rect with the image's aspect ratio centred inside `frame`.
fn fit_inside(frame: egui::Rect, image: egui::Vec2) -> egui::Rect {
    if image.x <= 0.0 || image.y <= 0.0 {
        return frame;
    }
    let scale = (frame.width() / image.x).min(frame.height() / image.y);
    egui::Rect::from_center_size(frame.center(), image * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_uses_the_tighter_axis() {
        let scale = fit_scale(100.0, 200.0, egui::vec2(400.0, 300.0));
        assert!((scale - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_fit_scale_is_capped() {
        assert_eq!(fit_scale(10.0, 10.0, egui::vec2(1000.0, 1000.0)), 2.0);
        assert_eq!(fit_scale(0.0, 10.0, egui::vec2(100.0, 100.0)), 1.0);
    }

    #[test]
    fn test_fit_inside_keeps_aspect_ratio() {
        let frame = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 50.0));
        let fitted = fit_inside(frame, egui::vec2(20.0, 20.0));
        assert_eq!(fitted.size(), egui::vec2(50.0, 50.0));
        assert_eq!(fitted.center(), frame.center());
    }

    #[test]
    fn test_mapping_scales_from_origin() {
        let mapping = Mapping {
            origin: egui::pos2(10.0, 20.0),
            scale: 2.0,
        };
        let rect = mapping.rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(rect.min, egui::pos2(12.0, 24.0));
        assert_eq!(rect.size(), egui::vec2(6.0, 8.0));
    }
}
