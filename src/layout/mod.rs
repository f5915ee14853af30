//! Label layout: maps a [`LabelConfig`] to a positioned display list.
//!
//! [`render_label`] is a pure function. It selects one of the four layout
//! variants, converts the physical size to pixels and places every block of
//! the label. The resulting [`LabelLayout`] is drawn unchanged by the egui
//! preview, the SVG exporter and the PNG rasterizer.
//!
//! Optional blocks degrade instead of failing: a missing logo becomes a
//! placeholder, blank or unencodable QR and barcode payloads are omitted.

mod text;
mod variants;

pub use text::{ELLIPSIS, clamp_lines, line_height, lines_that_fit, text_width, wrap_text};

use crate::codes::{self, QrMatrix};
use crate::constants::{
    BARCODE_TEXT_SIZE, LOGO_PLACEHOLDER_SIZE, MM_TO_PX, NUTRITION_NOTE_SIZE, NUTRITION_PADDING,
    NUTRITION_ROW_SIZE, NUTRITION_TITLE_SIZE,
};
use crate::types::{LabelConfig, LayoutStyle, NutritionItem};

/// Converts millimetres to pixels at the fixed preview/export density.
pub fn mm_to_px(mm: f32) -> f32 {
    mm * MM_TO_PX
}

/// Axis-aligned rectangle in label pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width, never negative
    pub w: f32,
    /// Height, never negative
    pub h: f32,
}

impl Rect {
    /// Creates a rectangle, clamping negative sizes to zero.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Shrinks the rectangle by the given edge insets.
    pub fn inset(&self, top: f32, right: f32, bottom: f32, left: f32) -> Rect {
        Rect::new(self.x + left, self.y + top, self.w - left - right, self.h - top - bottom)
    }

    /// Splits off a band of height `h` from the top, followed by `gap`.
    pub fn take_top(&mut self, h: f32, gap: f32) -> Rect {
        let h = h.min(self.h);
        let band = Rect::new(self.x, self.y, self.w, h);
        let consumed = (h + gap).min(self.h);
        self.y += consumed;
        self.h -= consumed;
        band
    }

    /// Splits off a band of height `h` from the bottom, preceded by `gap`.
    pub fn take_bottom(&mut self, h: f32, gap: f32) -> Rect {
        let h = h.min(self.h);
        let band = Rect::new(self.x, self.bottom() - h, self.w, h);
        self.h = (self.h - h - gap).max(0.0);
        band
    }

    /// Splits the rectangle into `n` equal columns separated by `gap`.
    pub fn columns(&self, n: usize, gap: f32) -> Vec<Rect> {
        let n = n.max(1);
        let w = (self.w - gap * (n - 1) as f32) / n as f32;
        (0..n)
            .map(|i| Rect::new(self.x + i as f32 * (w + gap), self.y, w, self.h))
            .collect()
    }

    /// Whether `other` lies entirely inside this rectangle (with a small tolerance).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f32 = 0.01;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// Horizontal alignment of text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Flush left
    #[default]
    Left,
    /// Centred
    Center,
    /// Flush right
    Right,
}

/// Font weight, mapped to CSS weights by the exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    /// 300
    Light,
    /// 400
    #[default]
    Regular,
    /// 700
    Bold,
    /// 900
    Black,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn css(self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
            FontWeight::Black => 900,
        }
    }
}

/// Ink used for text and strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ink {
    /// Full black
    #[default]
    Black,
    /// White, used on black fills
    White,
    /// Grey, used for secondary text
    Muted,
}

impl Ink {
    /// Hex color used by the exporters.
    pub fn hex(self) -> &'static str {
        match self {
            Ink::Black => "#000000",
            Ink::White => "#ffffff",
            Ink::Muted => "#64748b",
        }
    }
}

/// How a text block is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Weight
    pub weight: FontWeight,
    /// Alignment inside the element box
    pub align: TextAlign,
    /// Italic face
    pub italic: bool,
    /// Monospace face
    pub monospace: bool,
    /// Drawn upper-cased; the stored content keeps its case
    pub uppercase: bool,
    /// Ink color
    pub ink: Ink,
}

impl TextStyle {
    /// Regular, left-aligned black text at `size` (clamped to at least 1px).
    pub fn new(size: f32) -> Self {
        Self {
            size: size.max(1.0),
            weight: FontWeight::Regular,
            align: TextAlign::Left,
            italic: false,
            monospace: false,
            uppercase: false,
            ink: Ink::Black,
        }
    }

    /// Sets the weight.
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Sets bold weight.
    pub fn bold(self) -> Self {
        self.weight(FontWeight::Bold)
    }

    /// Sets the alignment.
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Centres the text.
    pub fn centered(self) -> Self {
        self.align(TextAlign::Center)
    }

    /// Uses the italic face.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Uses the monospace face.
    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }

    /// Draws upper-cased.
    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    /// Sets the ink.
    pub fn ink(mut self, ink: Ink) -> Self {
        self.ink = ink;
        self
    }
}

/// What an element draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A block of wrapped text
    Text {
        /// The source text, verbatim
        content: String,
        /// Wrapped (and possibly clamped) lines to draw
        lines: Vec<String>,
        /// Drawing style
        style: TextStyle,
    },
    /// A solid black horizontal or vertical rule filling the rect
    Rule,
    /// An outlined rectangle
    Frame {
        /// Stroke width
        stroke: f32,
        /// Dashed outline
        dashed: bool,
    },
    /// A solid black rectangle
    Fill,
    /// The configured logo image
    Logo {
        /// Image URL or `data:` URI
        source: String,
    },
    /// Stand-in shown when no logo is configured
    LogoPlaceholder,
    /// An encoded QR code scaled to the rect
    QrCode {
        /// Original payload
        payload: String,
        /// Encoded modules
        matrix: QrMatrix,
    },
    /// An encoded barcode with its human readable line
    Barcode {
        /// Original payload
        payload: String,
        /// Encoded bars, `true` = bar
        bars: Vec<bool>,
        /// Width of one module in pixels
        module_width: f32,
        /// Height of the bars in pixels
        bar_height: f32,
    },
}

/// A positioned element of the label.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Where the element is drawn
    pub rect: Rect,
    /// What is drawn
    pub kind: ElementKind,
    /// Optional region outside of which the element is not visible
    pub clip: Option<Rect>,
}

/// The fully positioned label, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    /// Variant that produced the arrangement
    pub style: LayoutStyle,
    /// Label width in pixels
    pub width_px: f32,
    /// Label height in pixels
    pub height_px: f32,
    /// Elements in paint order
    pub elements: Vec<Element>,
}

impl LabelLayout {
    /// The full label area.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width_px, self.height_px)
    }

    /// Verbatim content of every text element, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match &element.kind {
            ElementKind::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Whether some text element holds exactly `content`.
    pub fn has_text(&self, content: &str) -> bool {
        self.texts().any(|text| text == content)
    }

    /// Whether some text element contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }

    /// What each visible text element actually paints: wrapped lines joined
    /// by a space, with the case transform applied.
    ///
    /// Elements lying outside the label or their clip region are skipped.
    pub fn painted_texts(&self) -> impl Iterator<Item = String> + '_ {
        let bounds = self.bounds();
        self.elements.iter().filter_map(move |element| match &element.kind {
            ElementKind::Text { lines, style, .. } => {
                let visible = bounds.contains_rect(&element.rect)
                    && element.clip.map_or(true, |clip| clip.contains_rect(&element.rect));
                if !visible || lines.is_empty() {
                    return None;
                }
                let joined = lines.join(" ");
                Some(if style.uppercase { joined.to_uppercase() } else { joined })
            }
            _ => None,
        })
    }

    /// Whether `content` is painted in full by one text element.
    ///
    /// Whitespace runs compare as single spaces and an uppercased style
    /// matches the uppercased content.
    pub fn shows_text(&self, content: &str) -> bool {
        let wanted = content.split_whitespace().collect::<Vec<_>>().join(" ");
        self.painted_texts()
            .any(|painted| painted == wanted || painted == wanted.to_uppercase())
    }

    /// Whether some painted, untruncated text element contains `needle`.
    pub fn shows_text_containing(&self, needle: &str) -> bool {
        self.painted_texts().any(|painted| {
            !painted.ends_with(ELLIPSIS)
                && (painted.contains(needle) || painted.contains(&needle.to_uppercase()))
        })
    }

    /// The QR element, if rendered.
    pub fn qr_code(&self) -> Option<&Element> {
        self.elements
            .iter()
            .find(|element| matches!(element.kind, ElementKind::QrCode { .. }))
    }

    /// The barcode element, if rendered.
    pub fn barcode(&self) -> Option<&Element> {
        self.elements
            .iter()
            .find(|element| matches!(element.kind, ElementKind::Barcode { .. }))
    }

    /// Whether a real logo (not the placeholder) is drawn.
    pub fn has_logo(&self) -> bool {
        self.elements
            .iter()
            .any(|element| matches!(element.kind, ElementKind::Logo { .. }))
    }
}

/// Lays out a label for the given configuration.
///
/// Same input, same output: no state is kept between calls.
pub fn render_label(config: &LabelConfig) -> LabelLayout {
    let width_px = mm_to_px(config.width.max(0.0));
    let height_px = mm_to_px(config.height.max(0.0));
    let content = Rect::new(0.0, 0.0, width_px, height_px).inset(
        config.padding_top.max(0.0),
        config.padding_right.max(0.0),
        config.padding_bottom.max(0.0),
        config.padding_left.max(0.0),
    );

    let mut builder = Builder::new(config);
    match config.layout_style {
        LayoutStyle::Classic => variants::classic(&mut builder, content),
        LayoutStyle::Modern => variants::modern(&mut builder, content),
        LayoutStyle::Minimal => variants::minimal(&mut builder, content),
        LayoutStyle::Compact => variants::compact(&mut builder, content),
    }

    LabelLayout {
        style: config.layout_style,
        width_px,
        height_px,
        elements: builder.elements,
    }
}

/// Accumulates elements while a variant places its blocks.
pub(crate) struct Builder<'a> {
    pub(crate) config: &'a LabelConfig,
    elements: Vec<Element>,
    qr: Option<QrMatrix>,
    bars: Option<Vec<bool>>,
}

impl<'a> Builder<'a> {
    fn new(config: &'a LabelConfig) -> Self {
        Self {
            config,
            elements: Vec::new(),
            qr: codes::encode_qr(&config.qr_code),
            bars: codes::encode_barcode(&config.barcode),
        }
    }

    fn push(&mut self, rect: Rect, kind: ElementKind) {
        self.elements.push(Element { rect, kind, clip: None });
    }

    fn push_clipped(&mut self, rect: Rect, kind: ElementKind, clip: Rect) {
        self.elements.push(Element {
            rect,
            kind,
            clip: Some(clip),
        });
    }

    /// Height `content` needs inside `width` when clamped to `max_lines`.
    pub(crate) fn measure(&self, content: &str, style: TextStyle, width: f32, max_lines: usize) -> f32 {
        if content.is_empty() {
            return 0.0;
        }
        let lines = wrap_text(content, style.size, width).len().min(max_lines.max(1));
        lines as f32 * line_height(style.size)
    }

    /// Places wrapped text at the top of `area`, returning the height used.
    ///
    /// The text is clamped to `max_lines` and to the lines that fit in `area`.
    pub(crate) fn text(&mut self, area: Rect, content: &str, style: TextStyle, max_lines: usize) -> f32 {
        if content.is_empty() {
            return 0.0;
        }
        let fit = lines_that_fit(area.h, style.size);
        let lines = clamp_lines(wrap_text(content, style.size, area.w), max_lines.min(fit));
        let h = lines.len() as f32 * line_height(style.size);
        self.push(
            Rect::new(area.x, area.y, area.w, h),
            ElementKind::Text {
                content: content.to_string(),
                lines,
                style,
            },
        );
        h
    }

    /// A horizontal rule of `thickness` across `width` starting at (`x`, `y`).
    pub(crate) fn rule(&mut self, x: f32, y: f32, width: f32, thickness: f32) {
        self.push(Rect::new(x, y, width, thickness), ElementKind::Rule);
    }

    pub(crate) fn fill(&mut self, rect: Rect) {
        self.push(rect, ElementKind::Fill);
    }

    pub(crate) fn frame(&mut self, rect: Rect, stroke: f32) {
        self.push(rect, ElementKind::Frame { stroke, dashed: false });
    }

    /// Size of the logo block: the configured image size, or the placeholder square.
    pub(crate) fn logo_size(&self) -> (f32, f32) {
        if self.config.logo_url.trim().is_empty() {
            (LOGO_PLACEHOLDER_SIZE, LOGO_PLACEHOLDER_SIZE)
        } else {
            (self.config.logo_width.max(1.0), self.config.logo_height.max(1.0))
        }
    }

    /// Places the logo (or its placeholder) with its top-left corner at (`x`, `y`).
    pub(crate) fn logo(&mut self, x: f32, y: f32) -> Rect {
        let (w, h) = self.logo_size();
        let rect = Rect::new(x, y, w, h);
        if self.config.logo_url.trim().is_empty() {
            self.push(rect, ElementKind::Frame { stroke: 1.0, dashed: true });
            self.push(rect, ElementKind::LogoPlaceholder);
        } else {
            self.push(
                rect,
                ElementKind::Logo {
                    source: self.config.logo_url.clone(),
                },
            );
        }
        rect
    }

    /// Edge length of the QR block, or `None` when it is omitted.
    pub(crate) fn qr_size(&self, size_override: Option<f32>) -> Option<f32> {
        self.qr
            .as_ref()
            .map(|_| size_override.unwrap_or(self.config.qr_code_size).max(1.0))
    }

    /// Places the QR block with its top-left corner at (`x`, `y`).
    pub(crate) fn qr_code(&mut self, x: f32, y: f32, size: f32) {
        if let Some(matrix) = self.qr.clone() {
            self.push(
                Rect::new(x, y, size, size),
                ElementKind::QrCode {
                    payload: self.config.qr_code.clone(),
                    matrix,
                },
            );
        }
    }

    /// Size of the barcode block for the given bar geometry, or `None` when omitted.
    ///
    /// Includes the human readable line under the bars.
    pub(crate) fn barcode_size(&self, bar_height: f32, module_width: f32) -> Option<(f32, f32)> {
        self.bars.as_ref().map(|bars| {
            (
                bars.len() as f32 * module_width,
                bar_height + line_height(BARCODE_TEXT_SIZE),
            )
        })
    }

    /// Places the barcode block with its top-left corner at (`x`, `y`).
    ///
    /// Modules shrink when the block would be wider than `max_width`.
    pub(crate) fn barcode(&mut self, x: f32, y: f32, bar_height: f32, module_width: f32, max_width: f32) -> Option<Rect> {
        let bars = self.bars.clone()?;
        let natural = bars.len() as f32 * module_width;
        let module_width = if natural > max_width && max_width > 0.0 {
            max_width / bars.len() as f32
        } else {
            module_width
        };
        let rect = Rect::new(
            x,
            y,
            bars.len() as f32 * module_width,
            bar_height + line_height(BARCODE_TEXT_SIZE),
        );
        self.push(
            rect,
            ElementKind::Barcode {
                payload: self.config.barcode.clone(),
                bars,
                module_width,
                bar_height,
            },
        );
        Some(rect)
    }

    /// The shared nutrition block: framed title, three-column table and disclaimer.
    pub(crate) fn nutrition(&mut self, area: Rect) {
        let rows: Vec<NutritionItem> = self.config.nutrition.clone();
        self.frame(area, 1.0);

        let mut inner = area.inset(NUTRITION_PADDING, NUTRITION_PADDING, NUTRITION_PADDING, NUTRITION_PADDING);
        let title_style = TextStyle::new(NUTRITION_TITLE_SIZE).bold().centered().uppercase();
        let title = Rect::new(inner.x, inner.y, inner.w, line_height(NUTRITION_TITLE_SIZE));
        self.text(title, "Informação Nutricional", title_style, 1);
        inner.take_top(title.h + 2.0, 0.0);
        self.rule(inner.x, inner.y, inner.w, 1.0);
        inner.take_top(1.0, 2.0);

        let note_style = TextStyle::new(NUTRITION_NOTE_SIZE).italic();
        let note_h = line_height(NUTRITION_NOTE_SIZE);
        let note = inner.take_bottom(note_h, 2.0);
        self.text(note, "* % Valores Diários (2.000kcal).", note_style, 1);

        let row_h = line_height(NUTRITION_ROW_SIZE) + 2.0;
        let header = inner.take_top(row_h, 0.0);
        self.table_row(header, ["Nutriente", "Quant.", "%VD*"], true, None);
        self.rule(inner.x, inner.y, inner.w, 1.0);
        inner.take_top(1.0, 0.0);

        // Rows that overflow the frame stay in the display list but are clipped
        let clip = inner;
        let mut y = inner.y;
        for item in &rows {
            let row = Rect::new(inner.x, y, inner.w, row_h);
            self.table_row(
                row,
                [item.name.as_str(), item.amount.as_str(), item.daily_value.as_str()],
                false,
                Some(clip),
            );
            y += row_h;
        }
    }

    fn table_row(&mut self, row: Rect, cells: [&str; 3], header: bool, clip: Option<Rect>) {
        let widths = [row.w * 0.5, row.w * 0.25, row.w * 0.25];
        let mut x = row.x;
        for (i, cell) in cells.iter().enumerate() {
            let align = if i == 0 { TextAlign::Left } else { TextAlign::Right };
            let mut style = TextStyle::new(NUTRITION_ROW_SIZE).align(align);
            if header || i == 0 {
                style = style.bold();
            }
            let rect = Rect::new(x, row.y + 1.0, widths[i], line_height(NUTRITION_ROW_SIZE));
            x += widths[i];
            if cell.is_empty() {
                continue;
            }
            let lines = clamp_lines(wrap_text(cell, style.size, rect.w), 1);
            let kind = ElementKind::Text {
                content: cell.to_string(),
                lines,
                style,
            };
            match clip {
                Some(clip) => self.push_clipped(rect, kind, clip),
                None => self.push(rect, kind),
            }
        }
    }
}
