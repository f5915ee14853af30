//! Scannable code encoding for the barcode and QR blocks.
//!
//! Encoding happens while the label is laid out so that every back-end
//! (preview, SVG, PNG) draws exactly the same modules.

use barcoders::sym::code128::Code128;
use qrcode::{Color, EcLevel, QrCode};

/// Code 128 character-set B selector understood by the encoder.
const CODE128_SET_B: char = 'Ɓ';

/// A square matrix of QR modules, row-major, `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    /// Number of modules per side
    pub width: usize,
    /// Module colors in row-major order
    pub modules: Vec<bool>,
}

impl QrMatrix {
    /// Returns whether the module at column `x`, row `y` is dark.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }
}

/// Encodes a QR payload with medium error correction.
///
/// Returns `None` for blank payloads or payloads too long for any QR version.
pub fn encode_qr(payload: &str) -> Option<QrMatrix> {
    if payload.trim().is_empty() {
        return None;
    }
    match QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M) {
        Ok(code) => Some(QrMatrix {
            width: code.width(),
            modules: code
                .to_colors()
                .into_iter()
                .map(|color| color == Color::Dark)
                .collect(),
        }),
        Err(err) => {
            log::warn!("QR payload could not be encoded: {err:?}");
            None
        }
    }
}

/// Encodes a barcode payload as Code 128 (set B) bars, `true` = bar.
///
/// Returns `None` for blank payloads or characters outside the set.
pub fn encode_barcode(payload: &str) -> Option<Vec<bool>> {
    if payload.trim().is_empty() {
        return None;
    }
    match Code128::new(format!("{CODE128_SET_B}{payload}")) {
        Ok(code) => Some(code.encode().into_iter().map(|bit| bit == 1).collect()),
        Err(err) => {
            log::warn!("Barcode payload could not be encoded: {err:?}");
            None
        }
    }
}

/// Names the retail standard a barcode payload looks like, by digit count.
pub fn barcode_standard(payload: &str) -> &'static str {
    match payload.chars().filter(char::is_ascii_digit).count() {
        13 => "EAN-13",
        8 => "EAN-8",
        12 => "UPC-A",
        _ => "CODE128",
    }
}

/// Whether a QR payload is an absolute `http`/`https` link.
pub fn is_link(payload: &str) -> bool {
    url::Url::parse(payload)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_payloads_encode_to_nothing() {
        assert!(encode_qr("").is_none());
        assert!(encode_qr("   ").is_none());
        assert!(encode_barcode("").is_none());
        assert!(encode_barcode("\t").is_none());
    }

    #[test]
    fn test_qr_matrix_is_square() {
        let matrix = encode_qr("https://empresa.com.br").unwrap();
        assert!(matrix.width >= 21);
        assert_eq!(matrix.modules.len(), matrix.width * matrix.width);
        // Finder pattern corner is always dark.
        assert!(matrix.is_dark(0, 0));
        assert!(!matrix.is_dark(matrix.width, 0));
    }

    #[test]
    fn test_qr_encoding_is_deterministic() {
        assert_eq!(encode_qr("LOT-2024-001"), encode_qr("LOT-2024-001"));
    }

    #[test]
    fn test_barcode_starts_and_ends_with_bars() {
        let bars = encode_barcode("7891234567890").unwrap();
        assert!(bars.len() > 50);
        assert_eq!(bars.first(), Some(&true));
        assert_eq!(bars.last(), Some(&true));
    }

    #[test]
    fn test_barcode_rejects_characters_outside_set_b() {
        assert!(encode_barcode("ração").is_none());
    }

    #[test]
    fn test_barcode_standard_by_digit_count() {
        assert_eq!(barcode_standard("7891234567890"), "EAN-13");
        assert_eq!(barcode_standard("9638-5074"), "EAN-8");
        assert_eq!(barcode_standard("036000291452"), "UPC-A");
        assert_eq!(barcode_standard("ABC-123"), "CODE128");
    }

    #[test]
    fn test_is_link_accepts_only_http_schemes() {
        assert!(is_link("https://empresa.com.br"));
        assert!(is_link("http://localhost:8080/x"));
        assert!(!is_link("ftp://files.example.com"));
        assert!(!is_link("empresa.com.br"));
        assert!(!is_link(""));
    }
}
