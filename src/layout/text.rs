//! Deterministic text measurement and wrapping.
//!
//! The renderer must not depend on a font database, so widths are estimated
//! from the character count. Back-ends draw the lines exactly as wrapped here.

use crate::constants::{CHAR_WIDTH_FACTOR, LINE_HEIGHT_FACTOR};

/// Appended to the last kept line when text is cut short.
pub const ELLIPSIS: char = '…';

/// Estimated advance of `text` at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_FACTOR
}

/// Height of one line at `font_size`.
pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_FACTOR
}

/// Number of whole lines that fit into `height`, never less than one.
pub fn lines_that_fit(height: f32, font_size: f32) -> usize {
    ((height / line_height(font_size)).floor() as usize).max(1)
}

/// Greedy word wrap into lines no wider than `max_width`.
///
/// Explicit newlines are kept. Words longer than a line are split.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let per_line = ((max_width / (font_size * CHAR_WIDTH_FACTOR)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            // Flush full-width chunks of oversized words
            while chars.len() > per_line {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(per_line);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }

            let word_len = chars.len();
            if word_len == 0 {
                continue;
            }
            let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
            if needed > per_line {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars);
            current_len += word_len;
        }

        if current_len > 0 || paragraph.trim().is_empty() {
            lines.push(current);
        }
    }

    // Drop trailing blank lines produced by trailing newlines
    while lines.len() > 1 && lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Keeps at most `max_lines` lines, marking the cut with an ellipsis.
pub fn clamp_lines(mut lines: Vec<String>, max_lines: usize) -> Vec<String> {
    let max_lines = max_lines.max(1);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push(ELLIPSIS);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_stays_on_one_line() {
        assert_eq!(wrap_text("Lote", 10.0, 200.0), vec!["Lote".to_string()]);
    }

    #[test]
    fn test_wraps_on_word_boundaries() {
        // 10px font -> 5.5px per char -> 10 chars per line at 56px
        let lines = wrap_text("farinha de trigo e sal", 10.0, 56.0);
        assert_eq!(lines, vec!["farinha de", "trigo e", "sal"]);
    }

    #[test]
    fn test_splits_words_longer_than_a_line() {
        let lines = wrap_text("abcdefghijklmnop", 10.0, 56.0);
        assert_eq!(lines, vec!["abcdefghij", "klmnop"]);
    }

    #[test]
    fn test_keeps_explicit_newlines() {
        let lines = wrap_text("um\ndois", 10.0, 500.0);
        assert_eq!(lines, vec!["um", "dois"]);
    }

    #[test]
    fn test_clamp_adds_ellipsis() {
        let lines = clamp_lines(vec!["a".into(), "b".into(), "c".into()], 2);
        assert_eq!(lines, vec!["a", "b…"]);
        let lines = clamp_lines(vec!["a".into()], 0);
        assert_eq!(lines, vec!["a"]);
    }

    #[test]
    fn test_lines_that_fit_is_at_least_one() {
        assert_eq!(lines_that_fit(0.0, 10.0), 1);
        assert_eq!(lines_that_fit(26.0, 10.0), 2);
    }
}
