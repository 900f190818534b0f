use crate::lyrics::TrackQuery;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// What the player reports on each poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub track: String,
    pub artist: String,
    pub album: String,
    pub duration_sec: u64,
    pub progress_ms: u64,
}

impl PlaybackState {
    /// Key used to detect track changes.
    pub fn identity(&self) -> String {
        format!("{} - {}", self.track, self.artist)
    }

    pub fn query(&self) -> TrackQuery {
        TrackQuery {
            track: self.track.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            duration_sec: self.duration_sec,
        }
    }
}

/// Anything that can tell us what is playing right now 🎵
///
/// `Ok(None)` means nothing is playing; `Err` is a transient fetch failure.
/// Both leave the displayed lyrics untouched.
pub trait PlaybackSource: Send {
    fn current_playback(&mut self) -> impl Future<Output = Result<Option<PlaybackState>>> + Send;
}
