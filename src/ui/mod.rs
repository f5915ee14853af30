//! User interface of the label designer.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main LabelDesignerApp
//! - `tasks` - Background work and the channel back to the UI thread
//! - `editor` - The tabbed editor panel
//! - `templates` - Template library actions and tab
//! - `ai` - Content-assist actions
//! - `account` - Sign-in and account controls
//! - `file_ops` - Label file import/export and logo upload, native and WASM
//! - `export` - SVG/PNG export and printing
//! - `rendering` - Painting the live preview

mod account;
mod ai;
mod editor;
mod export;
mod file_ops;
mod rendering;
mod state;
mod tasks;
mod templates;

pub use state::{AccountState, AssistField, DbError, LabelDesignerApp, PendingConfirm, Services, SyncState, UiPrefs};
pub use tasks::TaskResult;

use crate::constants::{EDITOR_PANEL_MIN_WIDTH, UI_PREFS_KEY};
use crate::validation::{can_print, validate};
use eframe::egui;

impl eframe::App for LabelDesignerApp {
    /// Persist preferences and anything not yet written.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.prefs.to_json() {
            Ok(json) => storage.set_string(UI_PREFS_KEY, json),
            Err(err) => log::error!("Failed to serialize editor preferences: {err}"),
        }
        self.persist_changes(storage);
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.show(ctx);

        // Draft, templates and identity are written as soon as they change
        if let Some(storage) = frame.storage_mut() {
            self.persist_changes(storage);
        }
    }
}

impl LabelDesignerApp {
    /// Lays out one frame: toolbar, editor panel, preview and dialogs.
    pub fn show(&mut self, ctx: &egui::Context) {
        let visuals = if self.prefs.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.process_task_results();

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let max_width = (viewport_width * 0.7).max(EDITOR_PANEL_MIN_WIDTH);
        let width = self.prefs.editor_panel_width.clamp(EDITOR_PANEL_MIN_WIDTH, max_width);

        egui::SidePanel::left("editor_panel")
            .resizable(true)
            .default_width(width)
            .show(ctx, |ui| {
                self.prefs.editor_panel_width = ui.available_width().clamp(EDITOR_PANEL_MIN_WIDTH, max_width);
                self.draw_editor_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_preview(ui);
        });

        self.draw_dialogs(ctx);
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        let issues = validate(&self.config);
        let printable = can_print(&issues);

        ui.horizontal(|ui| {
            ui.heading("🖨 LabelMaster Pro");
            let (dot, status) = match (&self.services.remote, &self.sync.db_error) {
                (None, _) => (egui::Color32::GRAY, "Modo Offline"),
                (Some(_), Some(_)) => (egui::Color32::from_rgb(245, 158, 11), "Erro de Tabela"),
                (Some(_), None) => (egui::Color32::from_rgb(34, 197, 94), "Nuvem Conectada"),
            };
            ui.label(egui::RichText::new("●").color(dot));
            ui.label(egui::RichText::new(status).small());

            ui.separator();

            let (chip_color, chip_text) = if printable {
                (egui::Color32::from_rgb(22, 163, 74), "Pronto para Impressão")
            } else {
                (egui::Color32::from_rgb(220, 38, 38), "Layout Incompleto")
            };
            ui.label(egui::RichText::new(chip_text).strong().color(chip_color));

            ui.separator();

            if ui.button("Importar JSON").clicked() {
                self.import_config(ui.ctx());
            }
            if ui.button("Exportar JSON").clicked() {
                self.export_config(ui.ctx());
            }
            if ui.button("SVG").on_hover_text("Exportar como SVG").clicked() {
                self.export_svg(ui.ctx());
            }
            #[cfg(not(target_arch = "wasm32"))]
            if ui.button("PNG").on_hover_text("Exportar como PNG").clicked() {
                self.export_png(ui.ctx());
            }
            if ui
                .button(egui::RichText::new("IMPRIMIR").strong())
                .on_hover_text(if printable { "Imprimir etiqueta" } else { "Erro: Layout incompleto" })
                .clicked()
            {
                self.print_label(ui.ctx());
            }

            ui.separator();
            ui.checkbox(&mut self.prefs.dark_mode, "Modo escuro");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.draw_account_controls(ui);
            });
        });
    }

    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let status = if self.services.remote.is_none() {
                "Offline"
            } else if self.sync.db_error.is_some() {
                "Erro DB"
            } else if self.sync.syncing() {
                "Sincronizando"
            } else {
                "Cloud OK"
            };
            ui.label(egui::RichText::new(status).small().strong());
            ui.separator();
            ui.label(egui::RichText::new(self.config.printer.label()).small());
            ui.separator();
            ui.label(
                egui::RichText::new(format!("{:.0} x {:.0} mm", self.config.width, self.config.height)).small(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(format!("{} modelos", self.library.len())).small());
            });
        });
    }

    fn draw_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.pending_confirm_message() {
            egui::Window::new("Confirmar")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            self.confirm_pending(ui.ctx());
                        }
                        if ui.button("Cancelar").clicked() {
                            self.pending_confirm = None;
                        }
                    });
                });
        }

        if let Some(message) = self.notification.clone() {
            egui::Window::new("Aviso")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        self.notification = None;
                    }
                });
        }

        self.draw_login_window(ctx);

        if self.busy {
            egui::Window::new("Aguarde")
                .collapsible(false)
                .resizable(false)
                .title_bar(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.vertical(|ui| {
                            ui.strong("Aguarde");
                            ui.label("Processando Inteligência Artificial...");
                        });
                    });
                });
        }
    }
}

#[cfg(test)]
mod tests;
