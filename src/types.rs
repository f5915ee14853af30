//! Core data types for the label designer.
//!
//! This module defines the label configuration record edited by the user,
//! the saved template snapshot, and the cached identity of a signed-in user.
//! All types serialize with the camelCase field names used by exported
//! label files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for saved templates.
pub type TemplateId = Uuid;

/// One of the four fixed visual arrangements of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayoutStyle {
    /// Header with company identity, two columns of details, barcode footer
    #[default]
    Classic,
    /// Bold product banner, technical sheet column and company footer
    Modern,
    /// Large light title, centred details and a sparse footer
    Minimal,
    /// Dense vertical arrangement for small labels
    Compact,
}

impl LayoutStyle {
    /// All variants in the order they are offered in the editor.
    pub const ALL: [LayoutStyle; 4] = [
        LayoutStyle::Classic,
        LayoutStyle::Modern,
        LayoutStyle::Minimal,
        LayoutStyle::Compact,
    ];

    /// Display name, also used as the serialized value.
    pub fn label(self) -> &'static str {
        match self {
            LayoutStyle::Classic => "Clássico Profissional",
            LayoutStyle::Modern => "Moderno & Negrito",
            LayoutStyle::Minimal => "Minimalista Limpo",
            LayoutStyle::Compact => "Compacto Vertical",
        }
    }

    /// Parses a display name, returning `None` for unknown values.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.label() == label)
    }
}

impl From<String> for LayoutStyle {
    /// Unknown layout names fall back to [`LayoutStyle::Classic`].
    fn from(value: String) -> Self {
        Self::from_label(&value).unwrap_or_else(|| {
            log::warn!("Unknown layout style {value:?}, using {:?}", LayoutStyle::Classic);
            LayoutStyle::Classic
        })
    }
}

impl From<LayoutStyle> for String {
    fn from(value: LayoutStyle) -> Self {
        value.label().to_string()
    }
}

/// Thermal printer families the label is prepared for.
///
/// Purely informational: the rendered label does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrinterModel {
    /// Argox printers speaking PPLA/PPLB
    Argox,
    /// Bematech printers
    Bematech,
    /// Zebra printers speaking ZPL
    Zebra,
    /// Elgin printers
    Elgin,
    /// Any other USB thermal printer
    #[default]
    Generic,
}

impl PrinterModel {
    /// All printer models in menu order.
    pub const ALL: [PrinterModel; 5] = [
        PrinterModel::Argox,
        PrinterModel::Bematech,
        PrinterModel::Zebra,
        PrinterModel::Elgin,
        PrinterModel::Generic,
    ];

    /// Display name, also used as the serialized value.
    pub fn label(self) -> &'static str {
        match self {
            PrinterModel::Argox => "Argox (PPLA/PPLB)",
            PrinterModel::Bematech => "Bematech",
            PrinterModel::Zebra => "Zebra (ZPL)",
            PrinterModel::Elgin => "Elgin",
            PrinterModel::Generic => "Genérica / Térmica USB",
        }
    }
}

impl From<String> for PrinterModel {
    fn from(value: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|model| model.label() == value)
            .unwrap_or_default()
    }
}

impl From<PrinterModel> for String {
    fn from(value: PrinterModel) -> Self {
        value.label().to_string()
    }
}

/// A single row of the nutrition table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionItem {
    /// Nutrient name
    pub name: String,
    /// Quantity per serving, free text (e.g. "30g")
    pub amount: String,
    /// Percent of daily value, free text (e.g. "10%")
    pub daily_value: String,
}

impl NutritionItem {
    /// Creates a nutrition row from its three cells.
    pub fn new(name: impl Into<String>, amount: impl Into<String>, daily_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            daily_value: daily_value.into(),
        }
    }
}

/// The complete description of a label.
///
/// Every field has a default, so deserializing a partial document merges it
/// over [`LabelConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelConfig {
    /// Label width in millimetres
    pub width: f32,
    /// Label height in millimetres
    pub height: f32,
    /// Target printer family
    pub printer: PrinterModel,
    /// Visual arrangement
    pub layout_style: LayoutStyle,
    /// Product title, required for printing
    pub product_name: String,
    /// Ingredient list
    pub ingredients: String,
    /// Preparation hints
    pub preparation: String,
    /// Batch / lot code
    pub batch: String,
    /// Expiry date, free text
    pub expiry: String,
    /// Company name shown in the identity block
    pub company_name: String,
    /// Company address or contact line
    pub company_contact: String,
    /// WhatsApp number
    pub whatsapp: String,
    /// Contact e-mail
    pub email: String,
    /// Barcode payload; blank hides the barcode
    pub barcode: String,
    /// QR payload; blank hides the QR code
    pub qr_code: String,
    /// Logo as a URL or `data:` URI; blank shows a placeholder
    pub logo_url: String,
    /// Logo width in pixels
    pub logo_width: f32,
    /// Logo height in pixels
    pub logo_height: f32,
    /// Logo display size in pixels (editor preview)
    pub logo_display_size: f32,
    /// QR code edge length in pixels
    pub qr_code_size: f32,
    /// Top padding in pixels
    pub padding_top: f32,
    /// Bottom padding in pixels
    pub padding_bottom: f32,
    /// Left padding in pixels
    pub padding_left: f32,
    /// Right padding in pixels
    pub padding_right: f32,
    /// Gap between sections in pixels
    pub internal_spacing: f32,
    /// Base font size of the product name
    pub product_name_font_size: f32,
    /// Base font size of body text
    pub global_font_size: f32,
    /// Base font size of the company block
    pub company_font_size: f32,
    /// Nutrition rows in display order
    pub nutrition: Vec<NutritionItem>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 150.0,
            printer: PrinterModel::Generic,
            layout_style: LayoutStyle::Classic,
            product_name: "Nome do Seu Produto".into(),
            ingredients: "Farinha de trigo, água, sal, fermento biológico...".into(),
            preparation: "Aquecer em forno pré-aquecido por 10 minutos a 180°C.".into(),
            batch: "LOT-2024-001".into(),
            expiry: "2025-12-31".into(),
            company_name: "Minha Empresa Ltda".into(),
            company_contact: "Rua das Flores, 123 - Centro".into(),
            whatsapp: "(11) 99999-9999".into(),
            email: "contato@empresa.com.br".into(),
            barcode: "7891234567890".into(),
            qr_code: "https://empresa.com.br".into(),
            logo_url: String::new(),
            logo_width: 80.0,
            logo_height: 50.0,
            logo_display_size: 60.0,
            qr_code_size: 42.0,
            padding_top: 12.0,
            padding_bottom: 12.0,
            padding_left: 10.0,
            padding_right: 10.0,
            internal_spacing: 8.0,
            product_name_font_size: 16.0,
            global_font_size: 7.0,
            company_font_size: 8.0,
            nutrition: vec![
                NutritionItem::new("Valor Energético", "150 kcal", "8%"),
                NutritionItem::new("Carboidratos", "30g", "10%"),
                NutritionItem::new("Proteínas", "5g", "7%"),
                NutritionItem::new("Gorduras Totais", "2g", "3%"),
            ],
        }
    }
}

impl LabelConfig {
    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a configuration, merging the document over the defaults.
    ///
    /// Missing fields take their default value and unknown fields are ignored.
    /// A document that is not a JSON object is an error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// File name used when exporting, derived from the product name.
    ///
    /// The name is lowercased and every run of whitespace, leading and
    /// trailing runs included, becomes a single `-`.
    pub fn export_file_name(&self) -> String {
        let mut slug = String::with_capacity(self.product_name.len());
        let mut in_space = false;
        for ch in self.product_name.to_lowercase().chars() {
            if ch.is_whitespace() {
                if !in_space {
                    slug.push('-');
                }
                in_space = true;
            } else {
                slug.push(ch);
                in_space = false;
            }
        }
        format!("etiqueta-{slug}.json")
    }

    /// Appends a placeholder nutrition row.
    pub fn add_nutrition_item(&mut self) {
        self.nutrition.push(NutritionItem::new("Novo Nutriente", "0g", "0%"));
    }

    /// Removes the nutrition row at `index`, if present.
    pub fn remove_nutrition_item(&mut self, index: usize) -> Option<NutritionItem> {
        (index < self.nutrition.len()).then(|| self.nutrition.remove(index))
    }

    /// Replaces the nutrition row at `index`. Returns `false` when out of range.
    pub fn update_nutrition_item(&mut self, index: usize, item: NutritionItem) -> bool {
        match self.nutrition.get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }
}

/// A named, immutable snapshot of a label configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTemplate {
    /// Unique identifier, shared with the remote row when one exists
    pub id: TemplateId,
    /// Display name chosen by the user
    pub name: String,
    /// Creation date formatted as `dd/mm/yyyy`
    pub date: String,
    /// Deep copy of the configuration at save time
    pub config: LabelConfig,
}

impl SavedTemplate {
    /// Freezes the given configuration under a new identifier dated today.
    ///
    /// The configuration is cloned, so later edits to the working copy do
    /// not reach the snapshot.
    pub fn snapshot(name: impl Into<String>, config: &LabelConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: format_display_date(chrono::Local::now().date_naive()),
            config: config.clone(),
        }
    }
}

/// Formats a date the way template dates are shown (`dd/mm/yyyy`).
pub fn format_display_date(date: chrono::NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Identity provider a user signed in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Google OAuth
    #[default]
    Google,
    /// GitHub OAuth
    Github,
    /// E-mail and password
    Email,
}

impl AuthProvider {
    /// Provider name as used in OAuth query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Github => "github",
            AuthProvider::Email => "email",
        }
    }
}

/// The signed-in user as cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    /// Provider-side user identifier
    pub id: String,
    /// E-mail address, possibly empty
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar image URL, possibly empty
    pub avatar_url: String,
    /// Provider the session came from
    pub provider: AuthProvider,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_fully_populated() {
        let config = LabelConfig::default();
        assert_eq!(config.width, 100.0);
        assert_eq!(config.height, 150.0);
        assert_eq!(config.layout_style, LayoutStyle::Classic);
        assert_eq!(config.printer, PrinterModel::Generic);
        assert_eq!(config.nutrition.len(), 4);
        assert!(config.logo_url.is_empty());
    }

    #[test]
    fn test_serializes_camel_case_and_display_names() {
        let json = LabelConfig::default().to_json().unwrap();
        assert!(json.contains("\"productName\": \"Nome do Seu Produto\""));
        assert!(json.contains("\"layoutStyle\": \"Clássico Profissional\""));
        assert!(json.contains("\"printer\": \"Genérica / Térmica USB\""));
        assert!(json.contains("\"dailyValue\": \"8%\""));
        assert!(json.contains("\"qrCodeSize\": 42.0"));
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let config = LabelConfig::from_json(
            r#"{"productName": "Pão de Queijo", "width": 60, "unknownField": true}"#,
        )
        .unwrap();
        assert_eq!(config.product_name, "Pão de Queijo");
        assert_eq!(config.width, 60.0);
        assert_eq!(config.height, 150.0);
        assert_eq!(config.company_name, "Minha Empresa Ltda");
        assert_eq!(config.nutrition, LabelConfig::default().nutrition);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(LabelConfig::from_json("not json").is_err());
        assert!(LabelConfig::from_json("[1, 2, 3]").is_err());
        assert!(LabelConfig::from_json(r#"{"width": "wide"}"#).is_err());
    }

    #[test]
    fn test_export_import_round_trip_is_lossless() {
        let mut original = LabelConfig {
            width: 58.5,
            height: 40.0,
            printer: PrinterModel::Zebra,
            layout_style: LayoutStyle::Compact,
            product_name: "Bolo de Cenoura".into(),
            barcode: String::new(),
            logo_url: "data:image/png;base64,AAAA".into(),
            padding_left: 3.25,
            ..LabelConfig::default()
        };
        original.add_nutrition_item();
        original.nutrition[0].daily_value = "12%".into();

        let restored = LabelConfig::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_unknown_layout_style_falls_back_to_classic() {
        let config = LabelConfig::from_json(r#"{"layoutStyle": "Art Déco"}"#).unwrap();
        assert_eq!(config.layout_style, LayoutStyle::Classic);

        let config = LabelConfig::from_json(r#"{"layoutStyle": "Compacto Vertical"}"#).unwrap();
        assert_eq!(config.layout_style, LayoutStyle::Compact);
    }

    #[test]
    fn test_unknown_printer_falls_back_to_generic() {
        let config = LabelConfig::from_json(r#"{"printer": "Epson"}"#).unwrap();
        assert_eq!(config.printer, PrinterModel::Generic);
    }

    #[test]
    fn test_export_file_name_is_sanitized() {
        let config = LabelConfig {
            product_name: "Pão  de Queijo\tMineiro".into(),
            ..LabelConfig::default()
        };
        assert_eq!(config.export_file_name(), "etiqueta-pão-de-queijo-mineiro.json");
    }

    #[test]
    fn test_export_file_name_keeps_edge_whitespace_as_dashes() {
        let config = LabelConfig {
            product_name: " Bolo \n".into(),
            ..LabelConfig::default()
        };
        assert_eq!(config.export_file_name(), "etiqueta--bolo-.json");
    }

    #[test]
    fn test_nutrition_row_editing() {
        let mut config = LabelConfig::default();
        config.add_nutrition_item();
        assert_eq!(config.nutrition.len(), 5);
        assert_eq!(config.nutrition[4], NutritionItem::new("Novo Nutriente", "0g", "0%"));

        assert!(config.update_nutrition_item(4, NutritionItem::new("Sódio", "120mg", "5%")));
        assert_eq!(config.nutrition[4].name, "Sódio");
        assert!(!config.update_nutrition_item(9, NutritionItem::default()));

        let removed = config.remove_nutrition_item(1).unwrap();
        assert_eq!(removed.name, "Carboidratos");
        assert_eq!(config.nutrition[1].name, "Proteínas");
        assert!(config.remove_nutrition_item(10).is_none());
    }

    #[test]
    fn test_duplicate_nutrition_rows_are_allowed() {
        let mut config = LabelConfig::default();
        config.nutrition = vec![NutritionItem::new("Sal", "1g", "1%"); 2];
        let restored = LabelConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored.nutrition.len(), 2);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_edits() {
        let mut working = LabelConfig::default();
        let saved = SavedTemplate::snapshot("Padrão", &working);

        working.product_name = "Outro".into();
        working.nutrition.clear();

        assert_eq!(saved.config.product_name, "Nome do Seu Produto");
        assert_eq!(saved.config.nutrition.len(), 4);
        assert_eq!(saved.name, "Padrão");
    }

    #[test]
    fn test_display_date_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_display_date(date), "07/03/2024");
    }

    #[test]
    fn test_app_user_provider_serializes_lowercase() {
        let user = AppUser {
            id: "1".into(),
            email: "a@b.c".into(),
            name: "Ana".into(),
            avatar_url: String::new(),
            provider: AuthProvider::Github,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"provider\":\"github\""));
    }
}
