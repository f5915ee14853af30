//! Content-assist actions. Failures keep the current text or table.

use eframe::egui;

use super::state::{AssistField, LabelDesignerApp};
use super::tasks::{spawn_task, TaskResult};
use crate::assist::AssistError;
use crate::types::NutritionItem;

impl LabelDesignerApp {
    /// Whether the content-assist buttons can be used right now.
    pub fn assist_available(&self) -> bool {
        self.services.assist.is_some() && !self.busy
    }

    /// Asks for a professional rewrite of `field`.
    pub fn improve_field(&mut self, ctx: &egui::Context, field: AssistField) {
        if self.busy {
            return;
        }
        let Some(assist) = self.services.assist.clone() else {
            log::warn!("Content assist is not configured");
            return;
        };
        self.busy = true;
        let current = field.value(&self.config).to_string();
        spawn_task(ctx, self.tasks.sender.clone(), async move {
            let result = assist.improve_text(field.topic(), &current).await;
            TaskResult::TextImproved { field, result }
        });
    }

    pub(crate) fn on_text_improved(&mut self, field: AssistField, result: Result<String, AssistError>) {
        self.busy = false;
        match result {
            Ok(text) => field.set(&mut self.config, text),
            Err(err) => log::error!("Content assist failed for {field:?}: {err}"),
        }
    }

    /// Asks for a nutrition table for the current product.
    pub fn generate_nutrition(&mut self, ctx: &egui::Context) {
        if self.busy {
            return;
        }
        let Some(assist) = self.services.assist.clone() else {
            log::warn!("Content assist is not configured");
            return;
        };
        self.busy = true;
        let product_name = self.config.product_name.clone();
        spawn_task(ctx, self.tasks.sender.clone(), async move {
            TaskResult::NutritionGenerated(assist.generate_nutrition(&product_name).await)
        });
    }

    pub(crate) fn on_nutrition_generated(&mut self, result: Result<Option<Vec<NutritionItem>>, AssistError>) {
        self.busy = false;
        match result {
            Ok(Some(rows)) => self.config.nutrition = rows,
            Ok(None) => log::warn!("Content assist returned no usable nutrition table"),
            Err(err) => log::error!("Nutrition generation failed: {err}"),
        }
    }
}
