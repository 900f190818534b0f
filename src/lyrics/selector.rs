//! Picks the lyric body to show out of a list of search results.
//!
//! Synced bodies win outright; plain ones are only a fallback and match on
//! track/artist alone.

use super::document::{build_plain, build_synced};
use super::{LyricDocument, LyricsError};
use serde::{Deserialize, Deserializer};

pub const DEFAULT_DURATION_TOLERANCE_SECS: u64 = 2;

// Bodies containing this are decoys and never shown.
const SPAM_MARKER: &str = "rickrolling";

/// One search result from an lrclib-compatible endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    #[serde(deserialize_with = "null_as_default")]
    pub track_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artist_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub album_name: String,
    /// Seconds, possibly fractional.
    #[serde(deserialize_with = "null_as_default")]
    pub duration: f64,
    pub synced_lyrics: Option<String>,
    pub plain_lyrics: Option<String>,
}

// lrclib sends `null` for unknown fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// What we are looking lyrics up for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery {
    pub track: String,
    pub artist: String,
    pub album: String,
    pub duration_sec: u64,
}

impl Candidate {
    fn synced_body(&self) -> Option<&str> {
        self.synced_lyrics.as_deref().filter(|s| !s.is_empty())
    }

    fn plain_body(&self) -> Option<&str> {
        self.plain_lyrics.as_deref().filter(|s| !s.is_empty())
    }

    fn same_track(&self, query: &TrackQuery) -> bool {
        eq_ignore_case(&self.track_name, &query.track)
            && eq_ignore_case(&self.artist_name, &query.artist)
    }

    fn duration_close(&self, query: &TrackQuery, tolerance_secs: u64) -> bool {
        let declared = self.duration.round();
        if !declared.is_finite() {
            return false;
        }
        (declared - query.duration_sec as f64).abs() <= tolerance_secs as f64
    }
}

pub fn select(candidates: &[Candidate], query: &TrackQuery) -> Result<LyricDocument, LyricsError> {
    select_within(candidates, query, DEFAULT_DURATION_TOLERANCE_SECS)
}

/// Same as [`select`] with an explicit duration tolerance.
pub fn select_within(
    candidates: &[Candidate],
    query: &TrackQuery,
    tolerance_secs: u64,
) -> Result<LyricDocument, LyricsError> {
    // Pass 1: synced
    for candidate in candidates {
        let Some(body) = candidate.synced_body() else {
            continue;
        };
        if !candidate.same_track(query) || !candidate.duration_close(query, tolerance_secs) {
            continue;
        }
        if body.to_lowercase().contains(SPAM_MARKER) {
            tracing::debug!(track = %candidate.track_name, "skipping decoy lyrics");
            continue;
        }
        return Ok(build_synced(body));
    }

    // Pass 2: plain, album and duration ignored
    if let Some((candidate, body)) = candidates
        .iter()
        .filter_map(|c| c.plain_body().map(|body| (c, body)))
        .find(|(c, _)| c.same_track(query))
    {
        tracing::debug!(track = %candidate.track_name, "falling back to plain lyrics");
        return Ok(build_plain(body));
    }

    Err(LyricsError::NotFound {
        track: query.track.clone(),
        artist: query.artist.clone(),
    })
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
