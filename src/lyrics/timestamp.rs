//! `[mm:ss]` / `[mm:ss.ff]` / `[mm:ss.fff]` line tags.

use super::LyricLine;

/// Parses one tagged line. Returns `None` for anything without a leading tag.
///
/// The text after `]` is kept verbatim, surrounding whitespace included.
pub fn parse_line(line: &str) -> Option<LyricLine> {
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let timestamp_ms = parse_timestamp(&rest[..close])?;

    Some(LyricLine {
        timestamp_ms,
        text: rest[close + 1..].to_string(),
    })
}

/// `mm:ss(.frac)?` → milliseconds.
///
/// Two fraction digits are centiseconds, three are milliseconds and any
/// other length counts as zero.
pub fn parse_timestamp(ts: &str) -> Option<u64> {
    let (min, sec_part) = ts.split_once(':')?;
    let (sec, frac) = match sec_part.split_once('.') {
        Some((sec, frac)) => (sec, Some(frac)),
        None => (sec_part, None),
    };

    let min = parse_digits(min)?;
    let sec = parse_digits(sec)?;
    let ms = match frac {
        Some(frac) => {
            let value = parse_digits(frac)?;
            match frac.len() {
                2 => value * 10,
                3 => value,
                _ => 0,
            }
        }
        None => 0,
    };

    min.checked_mul(60_000)?
        .checked_add(sec.checked_mul(1_000)?)?
        .checked_add(ms)
}

// `str::parse` would let "+5" through
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
