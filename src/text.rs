//! UTF-8 safe text helpers for phrase labels and terminal rendering.
//!
//! Phrase text is user content and may hold emoji, accents, or stray escape
//! sequences pasted into the input box, so every slice here respects
//! character boundaries and every rendered string is sanitized first.

use unicode_width::UnicodeWidthChar;

/// Labels derived from free text are capped at this many characters.
pub const LABEL_MAX_CHARS: usize = 20;
/// Marker appended to a derived label that had to be cut.
pub const LABEL_ELLIPSIS: &str = "...";

/// Returns a prefix of the string up to `max_chars` characters.
pub fn safe_prefix(s: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Short button label for a phrase typed as free text.
///
/// Text with at most [`LABEL_MAX_CHARS`] characters is used as-is; longer text
/// keeps its first [`LABEL_MAX_CHARS`] characters followed by `...`.
pub fn derive_label(text: &str) -> String {
    if text.chars().count() <= LABEL_MAX_CHARS {
        return text.to_string();
    }
    format!("{}{LABEL_ELLIPSIS}", safe_prefix(text, LABEL_MAX_CHARS))
}

/// Strip escape sequences and control characters so user text cannot move the
/// cursor or repaint the board when rendered.
pub fn display_safe(s: &str) -> String {
    // Blank out tabs and newlines first; the escape stripper would drop them and
    // glue the surrounding words together. ESC and BEL delimit sequences.
    let spaced: String = s
        .chars()
        .map(|c| {
            if c.is_control() && c != '\u{1b}' && c != '\u{7}' {
                ' '
            } else {
                c
            }
        })
        .collect();
    let stripped = strip_ansi_escapes::strip_str(spaced);
    let cleaned: String = stripped
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    cleaned.trim_matches(|c| c == '\u{200B}' || c == '\u{FEFF}').to_string()
}

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

/// Return a slice of the string bounded by display columns rather than raw characters.
/// A double-width glyph that would straddle the right edge is dropped.
pub fn window_by_columns(s: &str, start_cols: usize, width_cols: usize) -> &str {
    if width_cols == 0 || s.is_empty() {
        return "";
    }

    let mut col = 0usize;
    let mut start_byte = None;
    let mut end_byte = s.len();
    let target_end = start_cols.saturating_add(width_cols);

    for (idx, ch) in s.char_indices() {
        let glyph_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        let next_col = col.saturating_add(glyph_width);

        if start_byte.is_none() && col >= start_cols {
            start_byte = Some(idx);
        }
        if start_byte.is_some() && next_col > target_end {
            end_byte = idx;
            break;
        }
        col = next_col;
    }

    match start_byte {
        Some(start) if start <= end_byte => &s[start..end_byte],
        _ => "",
    }
}

/// Fit a string into `width` columns, padding with spaces or cutting with `…`.
pub fn fit_columns(s: &str, width: usize) -> String {
    let used = display_width(s);
    if used <= width {
        let mut out = s.to_string();
        out.push_str(&" ".repeat(width - used));
        return out;
    }
    if width == 0 {
        return String::new();
    }
    let mut out = window_by_columns(s, 0, width - 1).to_string();
    out.push('…');
    let used = display_width(&out);
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_prefix_respects_multibyte_boundaries() {
        assert_eq!(safe_prefix("hello", 3), "hel");
        assert_eq!(safe_prefix("hello", 10), "hello");
        assert_eq!(safe_prefix("hello", 0), "");
        assert_eq!(safe_prefix("¿Dónde está?", 4), "¿Dón");
        assert_eq!(safe_prefix("💧agua", 2), "💧a");
    }

    #[test]
    fn derive_label_keeps_short_text() {
        assert_eq!(derive_label("Hola mundo"), "Hola mundo");
        let exact = "a".repeat(LABEL_MAX_CHARS);
        assert_eq!(derive_label(&exact), exact);
    }

    #[test]
    fn derive_label_cuts_long_text_with_ellipsis() {
        let label = derive_label("Necesito que me ayudes a levantarme");
        assert_eq!(label, "Necesito que me ayud...");
        assert_eq!(label.chars().count(), LABEL_MAX_CHARS + LABEL_ELLIPSIS.len());
    }

    #[test]
    fn derive_label_counts_characters_not_bytes() {
        let text = "ñ".repeat(LABEL_MAX_CHARS);
        assert_eq!(derive_label(&text), text);
        let longer = "ñ".repeat(LABEL_MAX_CHARS + 1);
        assert_eq!(derive_label(&longer), format!("{}...", "ñ".repeat(20)));
    }

    #[test]
    fn display_safe_strips_escape_sequences() {
        assert_eq!(display_safe("\u{1b}[31mrojo\u{1b}[0m"), "rojo");
        assert_eq!(display_safe("a\tb\nc"), "a b c");
        assert_eq!(display_safe("Gracias 🙏"), "Gracias 🙏");
    }

    #[test]
    fn display_safe_keeps_words_apart_around_controls() {
        assert_eq!(display_safe("Tengo\tfrío"), "Tengo frío");
        assert_eq!(display_safe("Te\r\namo"), "Te  amo");
        assert_eq!(display_safe("\u{1b}[1mHola\u{1b}[0m\tmundo"), "Hola mundo");
        assert_eq!(display_safe("\u{1b}]0;titulo\u{7}Hola"), "Hola");
    }

    #[test]
    fn window_by_columns_handles_wide_glyphs() {
        assert_eq!(window_by_columns("abcdef", 0, 3), "abc");
        assert_eq!(window_by_columns("abcdef", 2, 3), "cde");
        assert_eq!(window_by_columns("abcdef", 10, 5), "");
        assert_eq!(window_by_columns("你好世界", 0, 3), "你");
        assert_eq!(window_by_columns("你好世界", 2, 4), "好世");
    }

    #[test]
    fn fit_columns_pads_and_truncates() {
        assert_eq!(fit_columns("abc", 5), "abc  ");
        assert_eq!(fit_columns("abcdef", 4), "abc…");
        assert_eq!(display_width(&fit_columns("💧 Agua", 10)), 10);
        assert_eq!(fit_columns("abc", 0), "");
    }
}
