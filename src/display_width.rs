use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Replace `<br>`, `<br/>` and `<br />` (any case) with a single space, so a
/// multi-line label fits in one table cell.
pub fn flatten_breaks(s: &str) -> String {
    const TAGS: [&str; 3] = ["<br/>", "<br />", "<br>"];

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let tag = TAGS.iter().find(|tag| {
            rest.get(..tag.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(tag))
        });
        match tag {
            Some(tag) => {
                out.push(' ');
                rest = &rest[tag.len()..];
            }
            None => {
                out.push('<');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Cut `s` to at most `max` columns, marking the cut with `…`.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left-align `s` in a cell `width` columns wide.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn width_counts_wide_chars_twice() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("開始"), 4);
    }

    #[test]
    fn flatten_breaks_variants() {
        assert_eq!(flatten_breaks("hello"), "hello");
        assert_eq!(flatten_breaks("Hello<br/>World"), "Hello World");
        assert_eq!(flatten_breaks("A<br>B<BR />C"), "A B C");
        assert_eq!(flatten_breaks("a < b <bar>"), "a < b <bar>");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("short", 10), "short");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("開始終了", 5), "開始…");
    }

    #[test]
    fn pad_uses_display_width() {
        assert_eq!(pad_to_width("開", 4), "開  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }
}
