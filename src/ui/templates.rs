//! Template library: saving, loading and deleting snapshots, and the tab
//! that lists them.
//!
//! With a remote store configured the local list only changes after the
//! store accepted the change. Without one it changes immediately.

use eframe::egui;

use super::state::{DbError, LabelDesignerApp, PendingConfirm};
use super::tasks::{spawn_task, TaskResult};
use crate::constants::SQL_SETUP;
use crate::store::StoreError;
use crate::types::{SavedTemplate, TemplateId};

impl LabelDesignerApp {
    /// Fetches the remote list, replacing the local mirror on success.
    ///
    /// Also clears the store banner, so it doubles as the retry action.
    pub fn refresh_templates(&mut self, ctx: &egui::Context) {
        self.sync.db_error = None;
        let Some(remote) = self.services.remote.clone() else {
            return;
        };
        self.sync.start();
        spawn_task(ctx, self.tasks.sender.clone(), async move {
            TaskResult::TemplatesFetched(remote.list().await)
        });
    }

    pub(crate) fn on_templates_fetched(&mut self, result: Result<Vec<SavedTemplate>, StoreError>) {
        self.sync.finish();
        match result {
            Ok(templates) => self.library.replace_all(templates),
            Err(err) => {
                log::warn!("Template fetch failed: {err}");
                self.sync.db_error = Some(DbError::from(&err));
            }
        }
    }

    /// Saves the working configuration under the typed name.
    pub fn save_template(&mut self, ctx: &egui::Context) {
        let name = self.new_template_name.trim();
        if name.is_empty() {
            return;
        }
        let template = SavedTemplate::snapshot(name, &self.config);

        match self.services.remote.clone() {
            Some(remote) => {
                self.sync.start();
                spawn_task(ctx, self.tasks.sender.clone(), async move {
                    let result = remote.create(&template).await;
                    TaskResult::TemplateSaved { template, result }
                });
            }
            None => {
                log::info!("Saved template {} locally", template.id);
                self.library.insert_newest(template);
                self.new_template_name.clear();
            }
        }
    }

    pub(crate) fn on_template_saved(&mut self, template: SavedTemplate, result: Result<(), StoreError>) {
        self.sync.finish();
        match result {
            Ok(()) => {
                self.library.insert_newest(template);
                self.new_template_name.clear();
            }
            Err(err) => {
                log::error!("Failed to save template {}: {err}", template.id);
                self.sync.db_error = Some(DbError::from(&err));
            }
        }
    }

    /// Deletes the template with `id`.
    pub fn delete_template(&mut self, ctx: &egui::Context, id: TemplateId) {
        match self.services.remote.clone() {
            Some(remote) => {
                self.sync.start();
                spawn_task(ctx, self.tasks.sender.clone(), async move {
                    let result = remote.delete(id).await;
                    TaskResult::TemplateDeleted { id, result }
                });
            }
            None => {
                self.library.remove(id);
            }
        }
    }

    pub(crate) fn on_template_deleted(&mut self, id: TemplateId, result: Result<(), StoreError>) {
        self.sync.finish();
        match result {
            Ok(()) => {
                self.library.remove(id);
            }
            Err(err) => {
                log::error!("Failed to delete template {id}: {err}");
                self.notify(format!("Erro ao excluir modelo: {err}"));
            }
        }
    }

    /// Replaces the working configuration with the template's snapshot.
    pub fn load_template(&mut self, id: TemplateId) -> bool {
        match self.library.get(id) {
            Some(template) => {
                self.config = template.config.clone();
                log::info!("Loaded template {id}");
                true
            }
            None => false,
        }
    }

    /// Runs the confirmed action and closes the dialog.
    pub fn confirm_pending(&mut self, ctx: &egui::Context) {
        match self.pending_confirm.take() {
            Some(PendingConfirm::LoadTemplate(id)) => {
                self.load_template(id);
            }
            Some(PendingConfirm::DeleteTemplate(id)) => self.delete_template(ctx, id),
            None => {}
        }
    }

    /// Question shown for the pending action.
    pub fn pending_confirm_message(&self) -> Option<String> {
        match self.pending_confirm? {
            PendingConfirm::LoadTemplate(id) => {
                let name = self.library.get(id).map(|t| t.name.as_str()).unwrap_or_default();
                Some(format!("Deseja carregar o modelo \"{name}\"?"))
            }
            PendingConfirm::DeleteTemplate(_) => Some("Excluir este modelo permanentemente?".to_string()),
        }
    }

    pub(crate) fn draw_templates_tab(&mut self, ui: &mut egui::Ui) {
        if let Some(db_error) = self.sync.db_error.clone() {
            self.draw_db_error_banner(ui, &db_error);
            ui.add_space(8.0);
        }

        ui.group(|ui| {
            ui.label(egui::RichText::new("Salvar na Nuvem").strong());
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.new_template_name)
                        .hint_text("Nome do modelo")
                        .desired_width(200.0),
                );
                let label = if self.sync.syncing() {
                    "Enviando..."
                } else if self.sync.db_error.is_some() {
                    "Banco Indisponível"
                } else {
                    "Salvar Modelo"
                };
                let enabled = !self.new_template_name.trim().is_empty()
                    && !self.sync.syncing()
                    && self.sync.db_error.is_none();
                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                    self.save_template(ui.ctx());
                }
            });
        });

        ui.add_space(8.0);
        ui.label(egui::RichText::new(format!("Biblioteca ({})", self.library.len())).strong());

        if self.library.is_empty() {
            ui.weak("Nenhum modelo na biblioteca.");
            return;
        }

        let mut requested = None;
        for template in self.library.templates() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    let summary = format!(
                        "{}\n{} • {:.0}x{:.0}mm • {}",
                        template.name,
                        template
                            .config
                            .layout_style
                            .label()
                            .split_whitespace()
                            .next()
                            .unwrap_or_default(),
                        template.config.width,
                        template.config.height,
                        template.date
                    );
                    if ui.add(egui::Button::new(summary).frame(false)).clicked() {
                        requested = Some(PendingConfirm::LoadTemplate(template.id));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add_enabled(!self.sync.syncing(), egui::Button::new("🗑"))
                            .on_hover_text("Excluir modelo")
                            .clicked()
                        {
                            requested = Some(PendingConfirm::DeleteTemplate(template.id));
                        }
                    });
                });
            });
        }
        if requested.is_some() {
            self.pending_confirm = requested;
        }
    }

    fn draw_db_error_banner(&mut self, ui: &mut egui::Ui, db_error: &DbError) {
        let red = egui::Color32::from_rgb(185, 28, 28);
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .stroke(egui::Stroke::new(1.0, red))
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Script de Banco Pendente").strong().color(red));
                ui.label(&db_error.message);
                if db_error.table_missing {
                    ui.label("Crie a tabela no SQL Editor do Supabase:");
                    let mut script = SQL_SETUP;
                    ui.add(
                        egui::TextEdit::multiline(&mut script)
                            .code_editor()
                            .desired_rows(6)
                            .desired_width(f32::INFINITY),
                    );
                    if ui.button("Copiar SQL").clicked() {
                        ui.ctx().copy_text(SQL_SETUP.to_string());
                        self.notify("SQL copiado! Cole no SQL Editor do Supabase.");
                    }
                }
                let retry = if self.sync.syncing() {
                    "Verificando..."
                } else {
                    "Testar Conexão Novamente"
                };
                if ui.add_enabled(!self.sync.syncing(), egui::Button::new(retry)).clicked() {
                    self.refresh_templates(ui.ctx());
                }
            });
    }
}
