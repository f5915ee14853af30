//! Field validation for the working label.
//!
//! Validation never changes the configuration. Errors block printing and
//! mark the editor tab that owns the field; warnings are advisory.

use crate::constants::MIN_LABEL_WIDTH_MM;
use crate::types::LabelConfig;

/// Editor tabs, used to badge the tab that holds a faulty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorTab {
    /// Label size, printer and layout variant
    #[default]
    Dims,
    /// Product name and texts
    Product,
    /// Nutrition table
    Nutrition,
    /// Company identity and logo
    Company,
    /// Barcode and QR payloads
    Codes,
    /// Saved templates
    Templates,
}

impl EditorTab {
    /// Tabs in display order.
    pub const ALL: [EditorTab; 6] = [
        EditorTab::Dims,
        EditorTab::Product,
        EditorTab::Nutrition,
        EditorTab::Company,
        EditorTab::Codes,
        EditorTab::Templates,
    ];

    /// Tab caption.
    pub fn label(self) -> &'static str {
        match self {
            EditorTab::Dims => "Layout",
            EditorTab::Product => "Produto",
            EditorTab::Nutrition => "Nutrição",
            EditorTab::Company => "Empresa",
            EditorTab::Codes => "Códigos",
            EditorTab::Templates => "Modelos",
        }
    }
}

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks printing
    Error,
    /// Shown but does not block
    Warning,
}

/// A problem with one field of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// camelCase name of the offending field
    pub field: &'static str,
    /// Tab where the field is edited
    pub tab: EditorTab,
    /// Message shown next to the field
    pub message: String,
    /// Error or warning
    pub severity: Severity,
}

impl ValidationIssue {
    fn error(field: &'static str, tab: EditorTab, message: &str) -> Self {
        Self {
            field,
            tab,
            message: message.to_string(),
            severity: Severity::Error,
        }
    }
}

/// Checks the configuration and returns every issue found.
pub fn validate(config: &LabelConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.width < MIN_LABEL_WIDTH_MM {
        issues.push(ValidationIssue::error(
            "width",
            EditorTab::Dims,
            "Largura mínima: 20mm",
        ));
    }
    if config.product_name.trim().is_empty() {
        issues.push(ValidationIssue::error(
            "productName",
            EditorTab::Product,
            "Nome obrigatório",
        ));
    }

    issues
}

/// Whether printing is allowed, i.e. no issue is an error.
pub fn can_print(issues: &[ValidationIssue]) -> bool {
    !issues.iter().any(|issue| issue.severity == Severity::Error)
}

/// Whether some error belongs to `tab`.
pub fn has_error_on_tab(issues: &[ValidationIssue], tab: EditorTab) -> bool {
    issues
        .iter()
        .any(|issue| issue.tab == tab && issue.severity == Severity::Error)
}

/// The message for `field`, if it has an issue.
pub fn message_for<'a>(issues: &'a [ValidationIssue], field: &str) -> Option<&'a str> {
    issues
        .iter()
        .find(|issue| issue.field == field)
        .map(|issue| issue.message.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_label_blocks_printing() {
        let config = LabelConfig {
            width: 15.0,
            ..LabelConfig::default()
        };
        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "width");
        assert_eq!(issues[0].message, "Largura mínima: 20mm");
        assert!(!can_print(&issues));
        assert!(has_error_on_tab(&issues, EditorTab::Dims));
        assert!(!has_error_on_tab(&issues, EditorTab::Product));
    }

    #[test]
    fn test_valid_label_prints() {
        let config = LabelConfig {
            width: 100.0,
            product_name: "Pão de Queijo".into(),
            ..LabelConfig::default()
        };
        let issues = validate(&config);
        assert!(issues.is_empty());
        assert!(can_print(&issues));
    }

    #[test]
    fn test_minimum_width_is_allowed() {
        let config = LabelConfig {
            width: 20.0,
            ..LabelConfig::default()
        };
        assert!(can_print(&validate(&config)));
    }

    #[test]
    fn test_blank_product_name() {
        let config = LabelConfig {
            product_name: "   ".into(),
            ..LabelConfig::default()
        };
        let issues = validate(&config);
        assert!(has_error_on_tab(&issues, EditorTab::Product));
        assert_eq!(message_for(&issues, "productName"), Some("Nome obrigatório"));
        assert_eq!(message_for(&issues, "width"), None);
    }

    #[test]
    fn test_validation_does_not_modify_config() {
        let config = LabelConfig {
            width: 5.0,
            product_name: String::new(),
            ..LabelConfig::default()
        };
        let before = config.clone();
        assert_eq!(validate(&config).len(), 2);
        assert_eq!(config, before);
    }

    #[test]
    fn test_warnings_do_not_block() {
        let issues = vec![ValidationIssue {
            field: "expiry",
            tab: EditorTab::Product,
            message: "Validade vazia".into(),
            severity: Severity::Warning,
        }];
        assert!(can_print(&issues));
        assert!(!has_error_on_tab(&issues, EditorTab::Product));
    }
}
