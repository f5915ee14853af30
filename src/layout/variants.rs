//! The four label arrangements.
//!
//! Every variant receives the padded content area and places the same
//! fields; only composition and emphasis differ.

use super::{line_height, text_width, Builder, FontWeight, Ink, Rect, TextAlign, TextStyle};
use crate::constants::{CAPTION_SIZE, SMALL_CAPTION_SIZE};

/// Company header with QR, centred title, two detail columns, barcode footer.
pub(super) fn classic(b: &mut Builder, mut area: Rect) {
    let cfg = b.config;
    let gap = cfg.internal_spacing.max(0.0);

    // Header: logo, company identity, QR
    let (logo_w, logo_h) = b.logo_size();
    let qr = b.qr_size(None);
    let name_style = TextStyle::new(cfg.company_font_size + 2.0).bold().uppercase();
    let small = TextStyle::new(cfg.company_font_size - 1.0);
    let info_x = area.x + logo_w + 12.0;
    let info_right = area.right() - qr.map_or(0.0, |size| size + 8.0);
    let info_w = (info_right - info_x).max(0.0);
    let info_h = b.measure(&cfg.company_name, name_style, info_w, 1)
        + b.measure(&cfg.company_contact, small, info_w, 2)
        + 2.0
        + line_height(small.size);
    let header_h = logo_h.max(info_h).max(qr.unwrap_or(0.0));
    let header = area.take_top(header_h, 0.0);

    b.logo(header.x, header.y + (header_h - logo_h) / 2.0);

    let mut info = Rect::new(info_x, header.y + (header_h - info_h) / 2.0, info_w, info_h);
    let used = b.text(info, &cfg.company_name, name_style, 1);
    info.take_top(used, 0.0);
    let used = b.text(info, &cfg.company_contact, small, 2);
    info.take_top(used, 2.0);
    let wpp = format!("Wpp: {}", cfg.whatsapp);
    let wpp_w = (text_width(&wpp, small.size) + 1.0).min(info.w);
    b.text(Rect::new(info.x, info.y, wpp_w, info.h), &wpp, small, 1);
    let email_x = info.x + wpp_w + 8.0;
    b.text(
        Rect::new(email_x, info.y, info.right() - email_x, info.h),
        &cfg.email,
        small.italic(),
        1,
    );

    if let Some(size) = qr {
        b.qr_code(header.right() - size, header.y + (header_h - size) / 2.0, size);
    }

    area.take_top(8.0, 0.0);
    b.rule(area.x, area.y, area.w, 1.0);
    area.take_top(1.0, gap);

    // Product name
    let title_style = TextStyle::new(cfg.product_name_font_size)
        .weight(FontWeight::Black)
        .centered()
        .uppercase();
    let title_h = b.measure(&cfg.product_name, title_style, area.w, 2);
    let title = area.take_top(title_h, gap);
    b.text(title, &cfg.product_name, title_style, 2);

    // Barcode footer
    if let Some((bar_w, bar_h)) = b.barcode_size(25.0, 1.2) {
        let band = area.take_bottom(bar_h, gap);
        let w = bar_w.min(band.w);
        b.barcode(band.x + (band.w - w) / 2.0, band.y, 25.0, 1.2, band.w);
    }

    // Details and nutrition side by side
    let cols = area.columns(2, 12.0);
    let mut left = cols[0];

    let caption = TextStyle::new(SMALL_CAPTION_SIZE).bold();
    let value = TextStyle::new(cfg.global_font_size + 1.0).monospace();
    let pair_h = line_height(caption.size) + line_height(value.size);
    let pair = left.take_bottom(pair_h + 4.0, 8.0);
    b.rule(pair.x, pair.y, pair.w, 1.0);
    let halves = Rect::new(pair.x, pair.y + 4.0, pair.w, pair_h).columns(2, 4.0);
    labeled_value(b, halves[0], "Lote:", &cfg.batch, caption, value);
    labeled_value(b, halves[1], "Validade:", &cfg.expiry, caption, value);

    let section_gap = (gap / 4.0).max(2.0);
    let body = TextStyle::new(cfg.global_font_size);
    section(b, &mut left, "Ingredientes", &cfg.ingredients, body, 8, section_gap);
    section(b, &mut left, "Dicas de Preparo", &cfg.preparation, body.italic(), 3, section_gap);

    b.nutrition(cols[1]);
}

/// Logo and ruled title on top, technical sheet beside nutrition, company footer with codes.
pub(super) fn modern(b: &mut Builder, mut area: Rect) {
    let cfg = b.config;
    let gap = cfg.internal_spacing.max(0.0);

    let (logo_w, logo_h) = b.logo_size();
    let logo_band = area.take_top(logo_h, gap);
    b.logo(logo_band.x + (logo_band.w - logo_w) / 2.0, logo_band.y);

    let title_style = TextStyle::new(cfg.product_name_font_size + 4.0)
        .weight(FontWeight::Black)
        .centered()
        .uppercase();
    let title_h = b.measure(&cfg.product_name, title_style, area.w, 2);
    let band = area.take_top(title_h + 12.0, gap);
    b.rule(band.x, band.y, band.w, 2.0);
    b.text(
        Rect::new(band.x, band.y + 6.0, band.w, title_h),
        &cfg.product_name,
        title_style,
        2,
    );
    b.rule(band.x, band.bottom() - 2.0, band.w, 2.0);

    // Footer: company on the left, codes bottom-right
    let company = TextStyle::new(cfg.company_font_size);
    let qr = b.qr_size(None);
    let bars = b.barcode_size(22.0, 1.0);
    let codes_h = qr.unwrap_or(0.0).max(bars.map_or(0.0, |(_, h)| h));
    let text_h = line_height(company.size) * 2.0;
    let footer = area.take_bottom(9.0 + codes_h.max(text_h), gap);
    b.rule(footer.x, footer.y, footer.w, 1.0);
    let body = footer.inset(9.0, 0.0, 0.0, 0.0);

    let mut right = body.right();
    if let Some((bar_w, bar_h)) = bars {
        let max_w = body.w / 2.0;
        let w = bar_w.min(max_w);
        right -= w;
        b.barcode(right, body.bottom() - bar_h, 22.0, 1.0, max_w);
        right -= 8.0;
    }
    if let Some(size) = qr {
        right -= size;
        b.qr_code(right, body.bottom() - size, size);
        right -= 8.0;
    }
    let text_area = Rect::new(body.x, body.bottom() - text_h, right - body.x, text_h);
    let used = b.text(text_area, &cfg.company_name, company.bold(), 1);
    b.text(
        Rect::new(text_area.x, text_area.y + used, text_area.w, text_area.h - used),
        &cfg.whatsapp,
        company,
        1,
    );

    // Technical sheet and nutrition
    let cols = area.columns(2, 16.0);
    let mut left = cols[0];
    let banner = left.take_top(line_height(CAPTION_SIZE) + 8.0, 8.0);
    b.fill(banner);
    b.text(
        banner.inset(4.0, 0.0, 4.0, 0.0),
        "Ficha Técnica",
        TextStyle::new(CAPTION_SIZE)
            .bold()
            .centered()
            .uppercase()
            .ink(Ink::White),
        1,
    );

    let body = TextStyle::new(cfg.global_font_size);
    let pair_h = line_height(body.size);
    let pair = left.take_bottom(pair_h + 5.0, 4.0);
    b.rule(pair.x, pair.y, pair.w, 1.0);
    let halves = Rect::new(pair.x, pair.y + 5.0, pair.w, pair_h).columns(2, 4.0);
    b.text(halves[0], &format!("Lote: {}", cfg.batch), body, 1);
    b.text(
        halves[1],
        &format!("VAL: {}", cfg.expiry),
        body.align(TextAlign::Right),
        1,
    );
    b.text(left, &cfg.ingredients, body, usize::MAX);

    b.nutrition(cols[1]);
}

/// Large light title, ruled centre with details and nutrition, sparse footer.
pub(super) fn minimal(b: &mut Builder, mut area: Rect) {
    let cfg = b.config;
    let gap = cfg.internal_spacing.max(0.0);

    let (logo_w, logo_h) = b.logo_size();
    let logo_band = area.take_top(logo_h, gap);
    b.logo(logo_band.x + (logo_band.w - logo_w) / 2.0, logo_band.y);

    let title_style = TextStyle::new(cfg.product_name_font_size + 8.0)
        .weight(FontWeight::Light)
        .centered()
        .uppercase();
    let title_h = b.measure(&cfg.product_name, title_style, area.w, 2);
    let band = area.take_top(title_h + 8.0, gap);
    b.text(
        Rect::new(band.x, band.y + 8.0, band.w, title_h),
        &cfg.product_name,
        title_style,
        2,
    );

    // Footer line: "company • email"
    let footer_style = TextStyle::new(cfg.company_font_size)
        .bold()
        .centered()
        .uppercase();
    let footer_text = format!("{} • {}", cfg.company_name, cfg.email);
    let footer_h = b.measure(&footer_text, footer_style, area.w, 2);
    let footer = area.take_bottom(footer_h + 8.0, gap);
    b.text(
        Rect::new(footer.x, footer.y, footer.w, footer_h),
        &footer_text,
        footer_style,
        2,
    );

    // Codes row, centred
    let bars = b.barcode_size(35.0, 1.5);
    let qr = b.qr_size(None);
    if bars.is_some() || qr.is_some() {
        let row_h = bars.map_or(0.0, |(_, h)| h).max(qr.unwrap_or(0.0));
        let row = area.take_bottom(row_h + 8.0, gap);
        let qr_part = qr.map_or(0.0, |size| size + if bars.is_some() { 8.0 } else { 0.0 });
        let max_bar_w = (row.w - qr_part).max(0.0);
        let bar_w = bars.map_or(0.0, |(w, _)| w.min(max_bar_w));
        let mut x = row.x + (row.w - bar_w - qr_part).max(0.0) / 2.0;
        let bottom = row.bottom();
        if let Some((_, bar_h)) = bars {
            b.barcode(x, bottom - bar_h, 35.0, 1.5, max_bar_w);
            x += bar_w + 8.0;
        }
        if let Some(size) = qr {
            b.qr_code(x, bottom - size, size);
        }
    }

    // Ruled centre
    b.rule(area.x, area.y, area.w, 1.0);
    b.rule(area.x, area.bottom() - 1.0, area.w, 1.0);
    let mut middle = area.inset(1.0 + gap, 0.0, 1.0 + gap, 0.0);
    let wide_gap = gap * 1.5;

    let body = TextStyle::new(cfg.global_font_size + 1.0).centered();
    let text_w = middle.w * 0.8;
    let used = b.text(
        Rect::new(middle.x + (middle.w - text_w) / 2.0, middle.y, text_w, middle.h),
        &cfg.ingredients,
        body,
        6,
    );
    middle.take_top(used, wide_gap);

    let codes_style = TextStyle::new(cfg.global_font_size + 3.0).monospace();
    let pair = middle.take_top(line_height(codes_style.size), wide_gap);
    let batch = format!("L:{}", cfg.batch);
    let expiry = format!("V:{}", cfg.expiry);
    let batch_w = text_width(&batch, codes_style.size) + 1.0;
    let expiry_w = text_width(&expiry, codes_style.size) + 1.0;
    let x = pair.x + (pair.w - batch_w - 40.0 - expiry_w).max(0.0) / 2.0;
    b.text(Rect::new(x, pair.y, batch_w, pair.h), &batch, codes_style, 1);
    b.text(
        Rect::new(x + batch_w + 40.0, pair.y, expiry_w, pair.h),
        &expiry,
        codes_style,
        1,
    );

    b.nutrition(middle);
}

/// Dense stack: identity header, ingredients and nutrition, code footer.
pub(super) fn compact(b: &mut Builder, mut area: Rect) {
    let cfg = b.config;
    let gap = cfg.internal_spacing.max(0.0) / 2.0;

    let (logo_w, logo_h) = b.logo_size();
    let name_style = TextStyle::new(cfg.product_name_font_size - 2.0).bold();
    let company_style = TextStyle::new(cfg.company_font_size - 2.0).ink(Ink::Muted);
    let text_h = line_height(name_style.size) + line_height(company_style.size);
    let header_h = logo_h.max(text_h);
    let header = area.take_top(header_h + 4.0, 0.0);
    b.logo(header.x, header.y + (header_h - logo_h) / 2.0);
    let text_x = header.x + logo_w + 8.0;
    let names = Rect::new(
        text_x,
        header.y + (header_h - text_h) / 2.0,
        header.right() - text_x,
        text_h,
    );
    let used = b.text(names, &cfg.product_name, name_style, 1);
    b.text(
        Rect::new(names.x, names.y + used, names.w, names.h - used),
        &cfg.company_name,
        company_style,
        1,
    );
    b.rule(area.x, area.y, area.w, 1.0);
    area.take_top(1.0, gap);

    // Footer: batch/expiry on the left, codes on the right
    let small = TextStyle::new(cfg.global_font_size - 1.0);
    let pair_h = line_height(small.size) * 2.0 + 4.0;
    let qr = b.qr_size(None);
    let bars = b.barcode_size(15.0, 0.8);
    let footer_h = pair_h
        .max(qr.unwrap_or(0.0))
        .max(bars.map_or(0.0, |(_, h)| h));
    let footer = area.take_bottom(footer_h + 5.0, gap);
    b.rule(footer.x, footer.y, footer.w, 1.0);
    let cols = footer.inset(5.0, 0.0, 0.0, 0.0).columns(2, 8.0);

    let pair = Rect::new(cols[0].x, cols[0].y + (cols[0].h - pair_h) / 2.0, cols[0].w, pair_h);
    let used = b.text(pair, &format!("L: {}", cfg.batch), small, 1);
    b.text(
        Rect::new(pair.x, pair.y + used + 4.0, pair.w, pair.h - used - 4.0),
        &format!("V: {}", cfg.expiry),
        small,
        1,
    );

    let codes = cols[1];
    let mid_y = codes.y + codes.h / 2.0;
    let mut right = codes.right();
    if let Some((bar_w, bar_h)) = bars {
        let max_w = (codes.w - qr.map_or(0.0, |size| size + 4.0)).max(0.0);
        let w = bar_w.min(max_w);
        right -= w;
        b.barcode(right, mid_y - bar_h / 2.0, 15.0, 0.8, max_w);
        right -= 4.0;
    }
    if let Some(size) = qr {
        right -= size;
        b.qr_code(right, mid_y - size / 2.0, size);
    }

    // Ingredients line and nutrition
    let ingredients = format!("Ingr: {}", cfg.ingredients);
    let used = b.text(area, &ingredients, small, 6);
    area.take_top(used, gap);
    b.nutrition(area);
}

/// A caption with a rule under it, followed by clamped body text.
fn section(
    b: &mut Builder,
    column: &mut Rect,
    caption: &str,
    content: &str,
    style: TextStyle,
    max_lines: usize,
    gap_after: f32,
) {
    let caption_style = TextStyle::new(CAPTION_SIZE).bold().uppercase();
    let used = b.text(*column, caption, caption_style, 1);
    column.take_top(used, 0.0);
    b.rule(column.x, column.y, column.w, 1.0);
    column.take_top(1.0, 4.0);
    let used = b.text(*column, content, style, max_lines);
    column.take_top(used, gap_after);
}

/// A small bold caption above a value.
fn labeled_value(
    b: &mut Builder,
    area: Rect,
    caption: &str,
    value: &str,
    caption_style: TextStyle,
    value_style: TextStyle,
) {
    let used = b.text(area, caption, caption_style, 1);
    b.text(
        Rect::new(area.x, area.y + used, area.w, area.h - used),
        value,
        value_style,
        1,
    );
}
