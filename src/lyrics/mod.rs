pub mod document;
pub mod selector;
pub mod timestamp;
pub mod tracker;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use document::{build_plain, build_synced, INTERLUDE_GLYPH};
pub use selector::{select, Candidate, TrackQuery};
pub use timestamp::parse_line;
pub use tracker::{LyricsSession, PlaybackTracker, Snapshot};

/// One displayable lyric line. `timestamp_ms` is 0 for unsynced lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub timestamp_ms: u64,
    pub text: String,
}

impl LyricLine {
    pub fn new(timestamp_ms: u64, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            text: text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LyricMode {
    #[default]
    Synced,
    Plain,
}

/// An ordered lyric track. Lines keep source order; nothing re-sorts them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LyricDocument {
    pub lines: Vec<LyricLine>,
    pub mode: LyricMode,
}

impl LyricDocument {
    pub fn new(lines: Vec<LyricLine>, mode: LyricMode) -> Self {
        Self { lines, mode }
    }

    /// Placeholder used when no lyrics could be found for a track.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_synced(&self) -> bool {
        self.mode == LyricMode::Synced
    }

    /// Rewrites every line's text with `transform`, keeping count, order and offsets.
    pub fn map_text<T: TextTransform + ?Sized>(mut self, transform: &T) -> Self {
        for line in &mut self.lines {
            line.text = transform.apply(&line.text);
        }
        self
    }
}

/// Cosmetic per-line rewrite applied after a document is built (script conversion etc.)
pub trait TextTransform: Send + Sync {
    fn apply(&self, text: &str) -> String;
}

pub struct Identity;

impl TextTransform for Identity {
    fn apply(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Strips surrounding whitespace from each line.
pub struct Trimmed;

impl TextTransform for Trimmed {
    fn apply(&self, text: &str) -> String {
        text.trim().to_string()
    }
}

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("no lyrics found for {track} - {artist}")]
    NotFound { track: String, artist: String },
    #[error("lyrics network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("lyrics search returned HTTP {0}")]
    Status(u16),
}
