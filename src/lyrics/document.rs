use super::timestamp::parse_line;
use super::{LyricDocument, LyricLine, LyricMode};

/// Stands in for a blank line sitting between two sung lines.
pub const INTERLUDE_GLYPH: &str = "♪";

/// Builds a synced document from LRC text. Untagged lines are dropped.
pub fn build_synced(raw: &str) -> LyricDocument {
    let mut lines: Vec<LyricLine> = raw.lines().filter_map(parse_line).collect();
    mark_interludes(&mut lines);
    LyricDocument::new(lines, LyricMode::Synced)
}

/// Builds a plain document: one line per source line, all at offset 0.
///
/// Lines split like [`str::lines`]: `\n` or `\r\n` ends a line, the `\r` is
/// not kept and a trailing newline does not add an empty last line.
pub fn build_plain(raw: &str) -> LyricDocument {
    let mut lines: Vec<LyricLine> = raw.lines().map(|l| LyricLine::new(0, l)).collect();
    mark_interludes(&mut lines);
    LyricDocument::new(lines, LyricMode::Plain)
}

// Blank interior lines flanked by non-blank neighbours become ♪.
// First and last lines are left alone. Neighbours are judged on their
// original text, so two adjacent blanks stay blank.
fn mark_interludes(lines: &mut [LyricLine]) {
    if lines.len() < 3 {
        return;
    }

    let blank: Vec<bool> = lines.iter().map(LyricLine::is_blank).collect();
    for i in 1..lines.len() - 1 {
        if blank[i] && !blank[i - 1] && !blank[i + 1] {
            lines[i].text = INTERLUDE_GLYPH.to_string();
        }
    }
}
