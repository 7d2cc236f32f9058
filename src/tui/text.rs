//! Column-aware text helpers: width, truncation, padding and word wrap.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Clip `text` to at most `max_width` columns without an ellipsis.
#[must_use]
pub fn clip(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0_usize;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used.saturating_add(ch_width) > max_width {
            break;
        }
        out.push(ch);
        used = used.saturating_add(ch_width);
    }
    out
}

/// Truncate to `max_width` columns, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = clip(text, max_width - 1);
    out.push('…');
    out
}

/// Truncate then right-pad with spaces to exactly `width` columns.
#[must_use]
pub fn pad_to(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let used = display_width(&out);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Word-wrap `text` to `width` columns.
///
/// Existing line breaks are kept, blank lines survive, and words wider than
/// the line are hard-split.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.lines() {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let indent: String = raw.chars().take_while(|c| *c == ' ').collect();
        let indent = if display_width(&indent) < width / 2 {
            indent
        } else {
            String::new()
        };
        let mut current = indent.clone();
        let mut current_width = display_width(&current);
        let base_width = current_width;

        for word in raw.split_whitespace() {
            let word_width = display_width(word);
            let sep = usize::from(current_width > base_width);
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if current_width > base_width {
                lines.push(std::mem::replace(&mut current, indent.clone()));
                current_width = base_width;
            }
            let mut rest = word;
            while base_width + display_width(rest) > width {
                let head = clip(rest, width - base_width);
                if head.is_empty() {
                    break;
                }
                current.push_str(&head);
                lines.push(std::mem::replace(&mut current, indent.clone()));
                rest = &rest[head.len()..];
            }
            current.push_str(rest);
            current_width = base_width + display_width(rest);
        }
        if current_width > base_width {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("incident", 20), "incident");
        assert_eq!(truncate("incident", 5), "inci…");
        assert_eq!(truncate("incident", 0), "");
    }

    #[test]
    fn wide_chars_count_two_columns() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(clip("日本語", 5), "日本");
        assert_eq!(truncate("日本語", 5), "日本…");
    }

    #[test]
    fn pad_to_exact_width() {
        assert_eq!(pad_to("ab", 4), "ab  ");
        assert_eq!(display_width(&pad_to("abcdef", 4)), 4);
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn wrap_keeps_blank_lines_and_breaks() {
        let lines = wrap("a\n\nb", 10);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_preserves_short_indent() {
        let lines = wrap("  - one two three", 9);
        assert_eq!(lines, vec!["  - one", "  two", "  three"]);
    }

    #[test]
    fn every_wrapped_line_fits() {
        let text = "Rule checkout_3 fired for 4 consecutive evaluations against https://runbooks.example.com/checkout";
        for width in 1..40 {
            for line in wrap(text, width) {
                assert!(display_width(&line) <= width, "{line:?} > {width}");
            }
        }
    }
}
