//! # Label Designer
//!
//! A desktop and browser editor for printable product labels (thermal
//! printers, food and retail labels). The label is described by one
//! [`LabelConfig`] and drawn live in one of four layout variants.
//!
//! ## Features
//! - Live preview at print geometry
//! - Validation that blocks printing of unusable layouts
//! - QR codes and barcodes (EAN-13, EAN-8, UPC-A or Code 128)
//! - Content assist for ingredient text and nutrition tables
//! - Template library, kept locally and optionally in a hosted table
//! - SVG, PNG and JSON export, and a print page sized to the label
//! - Sign-in with OAuth providers or a plain e-mail address

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod assist;
pub mod auth;
pub mod codes;
pub mod constants;
mod http;
pub mod layout;
pub mod settings;
pub mod store;
pub mod svg;
pub mod types;
pub mod validation;
mod ui;

// Re-export public types and functions
pub use layout::{render_label, LabelLayout};
pub use settings::Settings;
pub use types::*;
pub use ui::{
    AccountState, AssistField, DbError, LabelDesignerApp, PendingConfirm, Services, SyncState, TaskResult,
    UiPrefs,
};
pub use validation::{can_print, validate, ValidationIssue};

/// Runs the label designer in a native window.
///
/// Background requests are spawned on tokio, so this must be called from
/// inside a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use label_designer::{run_app, Settings};
///
/// #[tokio::main]
/// async fn main() -> Result<(), eframe::Error> {
///     run_app(Settings::from_env())
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app(settings: Settings) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("LabelMaster Pro")
            .with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };
    eframe::run_native(
        "LabelMaster Pro",
        options,
        Box::new(move |cc| Ok(Box::new(LabelDesignerApp::new(cc, settings)))),
    )
}

/// Starts the label designer on the canvas with id `canvas_id`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub async fn start_web(canvas_id: &str) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("No document found")?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or("Canvas not found")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(LabelDesignerApp::new(cc, Settings::from_env())))),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label_is_printable() {
        let config = LabelConfig::default();
        assert!(can_print(&validate(&config)));

        let layout = render_label(&config);
        assert!(layout.width_px > 0.0);
        assert!(!layout.elements.is_empty());
    }

    #[test]
    fn test_default_settings_disable_remote_features() {
        let app = LabelDesignerApp::with_settings(Settings::default());
        assert!(app.services.remote.is_none());
        assert!(app.services.assist.is_none());
        assert!(app.services.auth.is_none());
        assert!(app.library.is_empty());
    }
}
