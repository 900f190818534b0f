use super::LyricDocument;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maps playback progress onto the current lyric line.
///
/// `None` means nothing is active yet (before the first cue, or a fresh
/// document). Plain documents never move by progress.
#[derive(Debug, Default)]
pub struct PlaybackTracker {
    document: Arc<LyricDocument>,
    active: Option<usize>,
}

impl PlaybackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Arc<LyricDocument> {
        &self.document
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Swaps in a new document and clears the active line.
    pub fn set_document(&mut self, document: LyricDocument) {
        self.document = Arc::new(document);
        self.active = None;
    }

    /// Recomputes the active line. Returns whether it changed.
    pub fn advance(&mut self, progress_ms: u64) -> bool {
        if !self.document.is_synced() {
            return false;
        }

        // Latest cue at or before progress wins; scanning from the end keeps
        // the highest index when timestamps repeat or run backwards.
        let next = self
            .document
            .lines
            .iter()
            .rposition(|line| line.timestamp_ms <= progress_ms);

        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: Arc::clone(&self.document),
            active: self.active,
        }
    }
}

/// A consistent (document, active line) pair for one frame.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub document: Arc<LyricDocument>,
    pub active: Option<usize>,
}

/// Tracker shared between the poller (writer) and the display (reader).
///
/// Every operation holds the lock for its whole duration, so a reader can
/// never see a new document paired with an old index.
#[derive(Debug, Clone, Default)]
pub struct LyricsSession {
    inner: Arc<Mutex<PlaybackTracker>>,
}

impl LyricsSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_document(&self, document: LyricDocument) {
        self.lock().set_document(document);
    }

    pub fn advance(&self, progress_ms: u64) -> bool {
        self.lock().advance(progress_ms)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackTracker> {
        // Poisoned state is still whole: writes never panic midway
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
