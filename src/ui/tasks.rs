//! Background work and its hand-off back to the UI thread.
//!
//! Requests run on tokio (native) or the browser's event loop (wasm) and
//! report through the app's channel, which is drained once per frame.

use std::future::Future;
use std::sync::mpsc::Sender;

use eframe::egui;

use super::state::{AssistField, LabelDesignerApp};
use crate::assist::AssistError;
use crate::auth::{AuthError, Session};
use crate::store::StoreError;
use crate::types::{AppUser, NutritionItem, SavedTemplate, TemplateId};

/// Messages sent from background work back to the app.
#[derive(Debug)]
pub enum TaskResult {
    /// The remote template list arrived
    TemplatesFetched(Result<Vec<SavedTemplate>, StoreError>),
    /// A remote insert finished
    TemplateSaved {
        /// The template that was sent
        template: SavedTemplate,
        /// Outcome of the insert
        result: Result<(), StoreError>,
    },
    /// A remote delete finished
    TemplateDeleted {
        /// Id of the deleted row
        id: TemplateId,
        /// Outcome of the delete
        result: Result<(), StoreError>,
    },
    /// A content-assist rewrite finished
    TextImproved {
        /// Field the rewrite is for
        field: AssistField,
        /// The rewritten text
        result: Result<String, AssistError>,
    },
    /// A nutrition table proposal finished
    NutritionGenerated(Result<Option<Vec<NutritionItem>>, AssistError>),
    /// The user behind an OAuth session was looked up
    SignedIn {
        /// Session from the redirect
        session: Session,
        /// The user it belongs to
        result: Result<AppUser, AuthError>,
    },
    /// The hosted session was closed
    SignedOut(Result<(), AuthError>),
    /// A label file was read
    ConfigFileRead(String),
    /// A logo image was read
    LogoFileRead(Vec<u8>),
    /// A file was written to the given location
    FileSaved(String),
    /// A file dialog was dismissed
    DialogCancelled,
    /// A file operation failed
    FileFailed(String),
}

/// Runs `task` in the background and sends its result to `sender`.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn spawn_task<F>(ctx: &egui::Context, sender: Sender<TaskResult>, task: F)
where
    F: Future<Output = TaskResult> + Send + 'static,
{
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let result = task.await;
        if sender.send(result).is_err() {
            log::warn!("App closed before a background task finished");
        }
        ctx.request_repaint();
    });
}

/// Runs `task` in the background and sends its result to `sender`.
#[cfg(target_arch = "wasm32")]
pub(crate) fn spawn_task<F>(ctx: &egui::Context, sender: Sender<TaskResult>, task: F)
where
    F: Future<Output = TaskResult> + 'static,
{
    let ctx = ctx.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = task.await;
        if sender.send(result).is_err() {
            log::warn!("App closed before a background task finished");
        }
        ctx.request_repaint();
    });
}

impl LabelDesignerApp {
    /// Applies every finished background task.
    pub fn process_task_results(&mut self) {
        while let Ok(result) = self.tasks.receiver.try_recv() {
            self.apply_task_result(result);
        }
    }

    /// Applies one finished background task.
    pub fn apply_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::TemplatesFetched(result) => self.on_templates_fetched(result),
            TaskResult::TemplateSaved { template, result } => self.on_template_saved(template, result),
            TaskResult::TemplateDeleted { id, result } => self.on_template_deleted(id, result),
            TaskResult::TextImproved { field, result } => self.on_text_improved(field, result),
            TaskResult::NutritionGenerated(result) => self.on_nutrition_generated(result),
            TaskResult::SignedIn { session, result } => self.on_signed_in(session, result),
            TaskResult::SignedOut(result) => {
                if let Err(err) = result {
                    log::warn!("Remote sign-out failed: {err}");
                }
            }
            TaskResult::ConfigFileRead(content) => {
                self.import_config_json(&content);
            }
            TaskResult::LogoFileRead(bytes) => {
                self.set_logo_from_bytes(&bytes);
            }
            TaskResult::FileSaved(location) => log::info!("Saved {location}"),
            TaskResult::DialogCancelled => log::debug!("File dialog cancelled"),
            TaskResult::FileFailed(message) => {
                log::error!("File operation failed: {message}");
                self.notify(message);
            }
        }
    }

    /// Blocks until one background task reports, then applies it.
    #[cfg(test)]
    pub(crate) fn wait_for_task(&mut self, timeout: std::time::Duration) -> bool {
        match self.tasks.receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.apply_task_result(result);
                true
            }
            Err(_) => false,
        }
    }
}
