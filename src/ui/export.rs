//! Export and print of the rendered label.
//!
//! Notes:
//! - SVG export works on all targets.
//! - PNG export is native only; it rasterizes the SVG with resvg.
//! - Printing opens a page sized to the label with zero margins.

use eframe::egui;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use super::file_ops::FileKind;
use super::state::LabelDesignerApp;
use crate::layout::render_label;
use crate::svg::{print_document, to_svg};
use crate::validation::{can_print, validate};

/// Rasterizes an SVG document to PNG bytes at `scale` times its size.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn rasterize_png(svg: &str, scale: f32) -> Result<Vec<u8>, String> {
    use tiny_skia::Pixmap;

    let mut options = usvg::Options::default();
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    options.fontdb = Arc::new(db);

    let tree = usvg::Tree::from_data(svg.as_bytes(), &options).map_err(|err| format!("SVG inválido: {err}"))?;
    let size = tree.size();
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| format!("Tamanho inválido: {width}x{height}"))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|err| format!("Falha ao gerar PNG: {err}"))
}

impl LabelDesignerApp {
    fn export_stem(&self) -> String {
        self.config
            .export_file_name()
            .trim_end_matches(".json")
            .to_string()
    }

    /// Saves the label as an SVG file.
    pub fn export_svg(&mut self, ctx: &egui::Context) {
        let svg = to_svg(&render_label(&self.config));
        let file_name = format!("{}.svg", self.export_stem());
        self.save_file(ctx, &file_name, FileKind::Svg, svg.into_bytes());
    }

    /// Saves the label as a PNG file at print resolution.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_png(&mut self, ctx: &egui::Context) {
        let svg = to_svg(&render_label(&self.config));
        match rasterize_png(&svg, crate::constants::PNG_EXPORT_SCALE) {
            Ok(png) => {
                let file_name = format!("{}.png", self.export_stem());
                self.save_file(ctx, &file_name, FileKind::Png, png);
            }
            Err(err) => {
                log::error!("PNG export failed: {err}");
                self.notify(err);
            }
        }
    }

    /// Sends the label to the printer, unless validation blocks it.
    ///
    /// Returns whether the print page was opened.
    pub fn print_label(&mut self, ctx: &egui::Context) -> bool {
        if !can_print(&validate(&self.config)) {
            self.notify("Erro: Layout incompleto");
            return false;
        }
        let document = print_document(&render_label(&self.config), &self.config.product_name);
        match Self::open_print_page(ctx, &document) {
            Ok(()) => true,
            Err(err) => {
                log::error!("Print failed: {err}");
                self.notify(format!("Falha ao imprimir: {err}"));
                false
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_print_page(ctx: &egui::Context, document: &str) -> Result<(), String> {
        let path = std::env::temp_dir().join(crate::constants::PRINT_FILE_NAME);
        std::fs::write(&path, document).map_err(|err| err.to_string())?;
        log::info!("Print page written to {}", path.display());
        let url = print_page_url(&path)?;
        ctx.open_url(egui::OpenUrl::new_tab(url.as_str()));
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn open_print_page(_ctx: &egui::Context, document: &str) -> Result<(), String> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let url = Self::blob_url(document.as_bytes(), "text/html")?;
        let window = web_sys::window().ok_or("No window found")?;
        let opened = window
            .open_with_url_and_target(&url, "_blank")
            .map_err(|_| "Failed to open print window".to_string());

        // The new tab loads the blob asynchronously, so release it later
        let revoke = Closure::once_into_js(move || {
            if let Err(err) = web_sys::Url::revoke_object_url(&url) {
                log::warn!("Could not revoke print page URL: {err:?}");
            }
        });
        if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.unchecked_ref(),
            crate::constants::PRINT_URL_LIFETIME_MS,
        ) {
            log::warn!("Could not schedule print page cleanup: {err:?}");
        }
        opened.map(|_| ())
    }
}

/// `file://` URL of the written print page, percent-encoded.
#[cfg(not(target_arch = "wasm32"))]
fn print_page_url(path: &std::path::Path) -> Result<url::Url, String> {
    url::Url::from_file_path(path).map_err(|()| format!("Invalid print file path: {}", path.display()))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::types::LabelConfig;

    #[test]
    fn test_png_has_the_scaled_label_size() {
        let config = LabelConfig {
            width: 50.0,
            height: 30.0,
            ..LabelConfig::default()
        };
        let svg = to_svg(&render_label(&config));
        let png = rasterize_png(&svg, 2.0).unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), (50.0_f32 * 3.78 * 2.0).round() as u32);
        assert_eq!(decoded.height(), (30.0_f32 * 3.78 * 2.0).round() as u32);
    }

    #[test]
    fn test_garbage_svg_is_an_error() {
        assert!(rasterize_png("<not-svg", 1.0).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_print_page_url_is_percent_encoded() {
        let url = print_page_url(std::path::Path::new("/tmp/minhas etiquetas/impressão.html")).unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.as_str(), "file:///tmp/minhas%20etiquetas/impress%C3%A3o.html");
    }

    #[test]
    fn test_relative_print_path_is_rejected() {
        assert!(print_page_url(std::path::Path::new("relativo/impressao.html")).is_err());
    }
}
