//! Lays a lyric document out on a fixed character grid, keeping the active
//! line vertically centred.

use super::utils::{truncate, wrap};
use crate::lyrics::LyricDocument;

/// How a row should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    /// Already sung.
    Before,
    /// The current line once playback has reached a cue.
    ActiveEmphasized,
    /// The centred line before anything has started; painted like `After`.
    ActivePlain,
    /// Still to come.
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub style: RowStyle,
}

impl Row {
    fn new(text: impl Into<String>, style: RowStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank(style: RowStyle) -> Self {
        Self::new(String::new(), style)
    }
}

/// Computes exactly `height` rows (or none for a degenerate grid / empty
/// document). Rows carry unpadded text no wider than `width`; the sink
/// centres them horizontally.
pub fn compose(document: &LyricDocument, active: Option<usize>, width: u16, height: u16) -> Vec<Row> {
    if width == 0 || height == 0 || document.is_empty() {
        return Vec::new();
    }

    let width = width as usize;
    let height = height as usize;
    let lines = &document.lines;
    let center = active.unwrap_or(0).min(lines.len() - 1);

    let active_style = if active.is_some() {
        RowStyle::ActiveEmphasized
    } else {
        RowStyle::ActivePlain
    };

    let mut current = wrap(&lines[center].text, width);
    // A line taller than the grid keeps its first rows
    current.truncate(height);
    let current_height = current.len();

    let top_pad = (height - current_height) / 2;
    let bottom_pad = height - top_pad - current_height;

    let mut rows = Vec::with_capacity(height);

    for row in 0..top_pad {
        let distance = top_pad - row;
        rows.push(match center.checked_sub(distance) {
            Some(idx) => Row::new(truncate(&lines[idx].text, width), RowStyle::Before),
            None => Row::blank(RowStyle::Before),
        });
    }

    rows.extend(current.into_iter().map(|text| Row::new(text, active_style)));

    for row in 0..bottom_pad {
        let idx = center + 1 + row;
        rows.push(match lines.get(idx) {
            Some(line) => Row::new(truncate(&line.text, width), RowStyle::After),
            None => Row::blank(RowStyle::After),
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::{LyricLine, LyricMode};

    fn doc(texts: &[&str]) -> LyricDocument {
        LyricDocument::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| LyricLine::new(i as u64 * 1000, *t))
                .collect(),
            LyricMode::Synced,
        )
    }

    fn texts(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.text.as_str()).collect()
    }

    fn styles(rows: &[Row]) -> Vec<RowStyle> {
        rows.iter().map(|r| r.style).collect()
    }

    #[test]
    fn test_centered_active_line() {
        let d = doc(&["zero", "one", "two", "three", "four"]);
        let rows = compose(&d, Some(2), 40, 5);

        assert_eq!(texts(&rows), vec!["zero", "one", "two", "three", "four"]);
        assert_eq!(
            styles(&rows),
            vec![
                RowStyle::Before,
                RowStyle::Before,
                RowStyle::ActiveEmphasized,
                RowStyle::After,
                RowStyle::After,
            ]
        );
    }

    #[test]
    fn test_out_of_range_rows_are_blank() {
        let d = doc(&["zero", "one", "two"]);
        let rows = compose(&d, Some(0), 40, 5);

        assert_eq!(texts(&rows), vec!["", "", "zero", "one", "two"]);

        let rows = compose(&d, Some(2), 40, 5);
        assert_eq!(texts(&rows), vec!["zero", "one", "two", "", ""]);
        assert_eq!(rows[4].style, RowStyle::After);
    }

    #[test]
    fn test_not_started_looks_like_upcoming() {
        let d = doc(&["zero", "one", "two"]);
        let rows = compose(&d, None, 40, 3);

        assert_eq!(texts(&rows), vec!["", "zero", "one"]);
        assert_eq!(rows[1].style, RowStyle::ActivePlain);
        assert_ne!(rows[1].style, RowStyle::ActiveEmphasized);
    }

    #[test]
    fn test_active_index_past_end_is_clamped() {
        let d = doc(&["zero", "one"]);
        let rows = compose(&d, Some(9), 40, 3);

        assert_eq!(texts(&rows), vec!["zero", "one", ""]);
        assert_eq!(rows[1].style, RowStyle::ActiveEmphasized);
    }

    #[test]
    fn test_even_height_pads_bottom_more() {
        let d = doc(&["a", "b", "c", "d", "e", "f"]);
        let rows = compose(&d, Some(3), 40, 4);

        // top_pad = (4 - 1) / 2 = 1, bottom_pad = 2
        assert_eq!(texts(&rows), vec!["c", "d", "e", "f"]);
        assert_eq!(rows[1].style, RowStyle::ActiveEmphasized);
    }

    #[test]
    fn test_wrapped_active_line() {
        let d = doc(&["before", "a long active line here", "after"]);
        let rows = compose(&d, Some(1), 10, 6);

        // wraps to 3 rows: top_pad = 1, bottom_pad = 2
        assert_eq!(
            texts(&rows),
            vec!["before", "a long", "active", "line here", "after", ""]
        );
        assert_eq!(rows[1].style, RowStyle::ActiveEmphasized);
        assert_eq!(rows[3].style, RowStyle::ActiveEmphasized);
    }

    #[test]
    fn test_active_taller_than_grid() {
        let d = doc(&["one two three four five six"]);
        let rows = compose(&d, Some(0), 3, 2);

        assert_eq!(rows.len(), 2);
        assert_eq!(texts(&rows), vec!["one", "two"]);
    }

    #[test]
    fn test_context_lines_truncated_to_width() {
        let d = doc(&["a very long previous line", "x", "another very long line"]);
        let rows = compose(&d, Some(1), 8, 3);

        assert_eq!(texts(&rows), vec!["a very …", "x", "another…"]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let d = doc(&["a"]);
        assert!(compose(&d, Some(0), 0, 5).is_empty());
        assert!(compose(&d, Some(0), 5, 0).is_empty());
        assert!(compose(&LyricDocument::empty(), None, 5, 5).is_empty());
    }

    #[test]
    fn test_always_exact_height() {
        let d = doc(&["a", "b c d e f g", "h", "", "i"]);
        for height in 1..12u16 {
            for width in 1..8u16 {
                for active in [None, Some(0), Some(1), Some(4), Some(7)] {
                    assert_eq!(compose(&d, active, width, height).len(), height as usize);
                }
            }
        }
    }

    #[test]
    fn test_line_reads_the_same_when_active() {
        let d = doc(&["intro", "  Headlights on", "outro"]);

        let before = compose(&d, Some(0), 20, 3);
        let during = compose(&d, Some(1), 20, 3);
        let after = compose(&d, Some(2), 20, 3);

        assert_eq!(before[2].text, "  Headlights on");
        assert_eq!(during[1].text, "  Headlights on");
        assert_eq!(during[1].style, RowStyle::ActiveEmphasized);
        assert_eq!(after[0].text, "  Headlights on");
    }
}
