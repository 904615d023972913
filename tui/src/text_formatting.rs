use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Truncate `text` to at most `max_width` display columns, ending with `…`
/// when anything was cut.
pub(crate) fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Tabs expanded to four spaces; other control characters dropped.
pub(crate) fn sanitize_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' => out.push_str("    "),
            '\r' | '\n' => {}
            ch if ch.is_control() => {}
            ch => out.push(ch),
        }
    }
    out
}
