//! Editor panel: one form per tab, all writing straight into the working
//! configuration.

use eframe::egui;

use super::state::{AssistField, LabelDesignerApp};
use crate::codes::{barcode_standard, is_link};
use crate::types::{LayoutStyle, PrinterModel};
use crate::validation::{has_error_on_tab, message_for, validate, EditorTab, ValidationIssue};

const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);

fn field_error(ui: &mut egui::Ui, issues: &[ValidationIssue], field: &str) {
    if let Some(message) = message_for(issues, field) {
        ui.label(egui::RichText::new(message).small().color(ERROR_RED));
    }
}

fn section(ui: &mut egui::Ui, title: &str) {
    ui.add_space(6.0);
    ui.label(egui::RichText::new(title).small().strong().weak());
}

fn badge(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).small().strong().color(color));
        });
}

impl LabelDesignerApp {
    /// Tab strip plus the active tab's form.
    pub(crate) fn draw_editor_panel(&mut self, ui: &mut egui::Ui) {
        let issues = validate(&self.config);

        ui.horizontal_wrapped(|ui| {
            for tab in EditorTab::ALL {
                let text = if has_error_on_tab(&issues, tab) {
                    egui::RichText::new(format!("{} ●", tab.label())).color(ERROR_RED)
                } else {
                    egui::RichText::new(tab.label())
                };
                ui.selectable_value(&mut self.active_tab, tab, text);
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            match self.active_tab {
                EditorTab::Dims => self.draw_dims_tab(ui, &issues),
                EditorTab::Product => self.draw_product_tab(ui, &issues),
                EditorTab::Nutrition => self.draw_nutrition_tab(ui),
                EditorTab::Company => self.draw_company_tab(ui),
                EditorTab::Codes => self.draw_codes_tab(ui),
                EditorTab::Templates => self.draw_templates_tab(ui),
            }
        });
    }

    fn draw_dims_tab(&mut self, ui: &mut egui::Ui, issues: &[ValidationIssue]) {
        section(ui, "Estilo do Layout");
        egui::Grid::new("layout_styles").num_columns(2).show(ui, |ui| {
            for (i, style) in LayoutStyle::ALL.into_iter().enumerate() {
                ui.selectable_value(&mut self.config.layout_style, style, style.label());
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });

        section(ui, "Impressora");
        egui::ComboBox::from_id_salt("printer_model")
            .selected_text(self.config.printer.label())
            .show_ui(ui, |ui| {
                for model in PrinterModel::ALL {
                    ui.selectable_value(&mut self.config.printer, model, model.label());
                }
            });

        section(ui, "Tamanho da Etiqueta");
        ui.horizontal(|ui| {
            ui.label("Largura");
            ui.add(egui::DragValue::new(&mut self.config.width).range(1.0..=500.0).suffix(" mm"));
            ui.label("Altura");
            ui.add(egui::DragValue::new(&mut self.config.height).range(1.0..=500.0).suffix(" mm"));
        });
        field_error(ui, issues, "width");

        section(ui, "Tipografia");
        ui.add(egui::Slider::new(&mut self.config.product_name_font_size, 10.0..=48.0).text("Título do produto"));
        ui.add(egui::Slider::new(&mut self.config.global_font_size, 4.0..=18.0).text("Textos de apoio"));
        ui.add(egui::Slider::new(&mut self.config.company_font_size, 6.0..=20.0).text("Empresa"));

        ui.add_space(6.0);
        egui::CollapsingHeader::new("Margens e espaçamento").show(ui, |ui| {
            ui.add(egui::Slider::new(&mut self.config.padding_top, 0.0..=60.0).text("Superior"));
            ui.add(egui::Slider::new(&mut self.config.padding_bottom, 0.0..=60.0).text("Inferior"));
            ui.add(egui::Slider::new(&mut self.config.padding_left, 0.0..=60.0).text("Esquerda"));
            ui.add(egui::Slider::new(&mut self.config.padding_right, 0.0..=60.0).text("Direita"));
            ui.add(egui::Slider::new(&mut self.config.internal_spacing, 0.0..=40.0).text("Entre blocos"));
        });
    }

    fn draw_product_tab(&mut self, ui: &mut egui::Ui, issues: &[ValidationIssue]) {
        section(ui, "Nome do Produto");
        ui.add(egui::TextEdit::singleline(&mut self.config.product_name).desired_width(f32::INFINITY));
        field_error(ui, issues, "productName");

        for (field, title) in [
            (AssistField::Ingredients, "Ingredientes"),
            (AssistField::Preparation, "Dicas de Preparo"),
        ] {
            ui.horizontal(|ui| {
                section(ui, title);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let button = ui
                        .add_enabled(self.assist_available(), egui::Button::new("✨ IA Profissional").small())
                        .on_disabled_hover_text("IA indisponível");
                    if button.clicked() {
                        self.improve_field(ui.ctx(), field);
                    }
                });
            });
            let text = match field {
                AssistField::Ingredients => &mut self.config.ingredients,
                AssistField::Preparation => &mut self.config.preparation,
            };
            ui.add(
                egui::TextEdit::multiline(text)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
        }

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                section(ui, "Lote");
                ui.add(egui::TextEdit::singleline(&mut self.config.batch).desired_width(140.0));
            });
            ui.vertical(|ui| {
                section(ui, "Validade");
                ui.add(egui::TextEdit::singleline(&mut self.config.expiry).desired_width(140.0));
            });
        });
    }

    fn draw_nutrition_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            section(ui, "Tabela Nutricional");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if self.busy { "Calculando..." } else { "✨ IA Gerar Tabela" };
                if ui
                    .add_enabled(self.assist_available(), egui::Button::new(label))
                    .on_disabled_hover_text("IA indisponível")
                    .clicked()
                {
                    self.generate_nutrition(ui.ctx());
                }
            });
        });

        let mut remove = None;
        egui::Grid::new("nutrition_rows")
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Nutriente").small().strong());
                ui.label(egui::RichText::new("Quant.").small().strong());
                ui.label(egui::RichText::new("%VD").small().strong());
                ui.label("");
                ui.end_row();

                for (index, item) in self.config.nutrition.iter_mut().enumerate() {
                    ui.add(egui::TextEdit::singleline(&mut item.name).desired_width(150.0));
                    ui.add(egui::TextEdit::singleline(&mut item.amount).desired_width(70.0));
                    ui.add(egui::TextEdit::singleline(&mut item.daily_value).desired_width(50.0));
                    if ui.small_button("🗑").on_hover_text("Remover").clicked() {
                        remove = Some(index);
                    }
                    ui.end_row();
                }
            });
        if let Some(index) = remove {
            self.config.remove_nutrition_item(index);
        }

        ui.add_space(6.0);
        if ui.button("➕ Adicionar Nutriente").clicked() {
            self.config.add_nutrition_item();
        }
    }

    fn draw_company_tab(&mut self, ui: &mut egui::Ui) {
        section(ui, "Logotipo");
        ui.horizontal(|ui| {
            if ui.button("Enviar Logo").clicked() {
                self.upload_logo(ui.ctx());
            }
            if !self.config.logo_url.is_empty() && ui.button("Remover").clicked() {
                self.clear_logo();
            }
        });
        if let Some(texture) = &self.logo.texture {
            if self.logo.source == self.config.logo_url {
                let size = texture.size_vec2();
                let scale = (self.config.logo_display_size / size.x.max(size.y)).min(1.0);
                ui.image((texture.id(), size * scale));
            }
        }
        ui.add(egui::Slider::new(&mut self.config.logo_width, 20.0..=200.0).text("Largura do logo"));
        ui.add(egui::Slider::new(&mut self.config.logo_height, 20.0..=200.0).text("Altura do logo"));

        section(ui, "Razão Social");
        ui.add(egui::TextEdit::singleline(&mut self.config.company_name).desired_width(f32::INFINITY));
        section(ui, "Endereço / Contato");
        ui.add(egui::TextEdit::singleline(&mut self.config.company_contact).desired_width(f32::INFINITY));
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                section(ui, "WhatsApp");
                ui.add(egui::TextEdit::singleline(&mut self.config.whatsapp).desired_width(140.0));
            });
            ui.vertical(|ui| {
                section(ui, "E-mail");
                ui.add(egui::TextEdit::singleline(&mut self.config.email).desired_width(180.0));
            });
        });
    }

    fn draw_codes_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            section(ui, "Código de Barras");
            if !self.config.barcode.trim().is_empty() {
                badge(ui, barcode_standard(&self.config.barcode), egui::Color32::from_rgb(37, 99, 235));
            }
        });
        ui.add(
            egui::TextEdit::singleline(&mut self.config.barcode)
                .hint_text("Vazio oculta o código")
                .desired_width(f32::INFINITY),
        );

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            section(ui, "QR Code");
            if !self.config.qr_code.trim().is_empty() {
                if is_link(&self.config.qr_code) {
                    badge(ui, "Link Válido", egui::Color32::from_rgb(22, 163, 74));
                } else {
                    badge(ui, "Somente Texto", egui::Color32::from_rgb(217, 119, 6));
                }
            }
        });
        ui.add(
            egui::TextEdit::singleline(&mut self.config.qr_code)
                .hint_text("Vazio oculta o QR")
                .desired_width(f32::INFINITY),
        );
        ui.add(egui::Slider::new(&mut self.config.qr_code_size, 20.0..=250.0).text("Tamanho do QR"));
    }
}
