use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Safely truncate string to `max_width` columns, appending "…" if truncated 🛡️
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1; // room for the ellipsis
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Greedy word wrap to `width` columns. Whitespace inside a row is kept as
/// written (so a wrapped line reads like its truncated form); whitespace at
/// a break is dropped. Words wider than a row are split at the column
/// boundary. Always yields at least one row.
pub fn wrap(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for segment in segments(s) {
        let segment_width = segment.width();

        if used + segment_width <= width {
            current.push_str(segment);
            used += segment_width;
            continue;
        }

        // Row is full; a row holding only indentation is discarded
        if current.trim().is_empty() {
            current.clear();
        } else {
            rows.push(current.trim_end().to_string());
            current.clear();
        }
        used = 0;

        if segment.trim().is_empty() {
            continue;
        }
        if segment_width <= width {
            current.push_str(segment);
            used = segment_width;
            continue;
        }

        // Hard break
        for c in segment.chars() {
            let w = c.width().unwrap_or(0);
            if used > 0 && used + w > width {
                rows.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(c);
            used += w;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

// Alternating runs of whitespace and non-whitespace, covering all of `s`.
fn segments(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (i, c) in s.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            out.push(&s[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("hello", 0), "");
        assert_eq!(truncate("你好世界", 5), "你好…");
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("short", 10), vec!["short"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("   ", 10), vec!["   "]);
    }

    #[test]
    fn test_wrap_keeps_spacing() {
        // Matches what truncate shows for the same line
        assert_eq!(wrap("  Headlights on", 20), vec!["  Headlights on"]);
        assert_eq!(wrap("  Headlights on", 20)[0], truncate("  Headlights on", 20));
        assert_eq!(wrap("la  la   la", 20), vec!["la  la   la"]);
    }

    #[test]
    fn test_wrap_drops_space_at_break() {
        assert_eq!(wrap("one   two", 5), vec!["one", "two"]);
        assert_eq!(wrap("  abcdefgh", 4), vec!["abcd", "efgh"]);
        assert_eq!(wrap("abcd    ", 4), vec!["abcd"]);
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn test_wrap_wide_chars() {
        assert_eq!(wrap("你好世界", 4), vec!["你好", "世界"]);
        // A glyph wider than the row still makes progress
        assert_eq!(wrap("你好", 1), vec!["你", "好"]);
    }

    #[test]
    fn test_wrap_rows_fit() {
        let text = "somewhere over the rainbow way up high there's a land that I heard of";
        for width in 1..30 {
            for row in wrap(text, width) {
                assert!(row.width() <= width.max(2), "{:?} wider than {}", row, width);
            }
        }
    }
}
