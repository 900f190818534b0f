//! Background task: watches playback, rebuilds lyrics on track change and
//! moves the active line along.

use super::config::UserConfig;
use super::events::RedrawSignal;
use super::lyrics::LyricsSource;
use crate::lyrics::selector::select_within;
use crate::lyrics::{Identity, LyricDocument, LyricsSession, TextTransform, Trimmed};
use crate::player::{PlaybackSource, PlaybackState};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing playing or the fetch failed; state untouched.
    Idle,
    Updated {
        track_changed: bool,
        line_changed: bool,
    },
}

pub struct Poller<P, L> {
    playback: P,
    lyrics: L,
    session: LyricsSession,
    redraw: RedrawSignal,
    transform: Box<dyn TextTransform>,
    tolerance_secs: u64,
    poll_interval: Duration,
    retry_delay: Duration,
    last_track: Option<String>,
}

impl<P: PlaybackSource, L: LyricsSource> Poller<P, L> {
    pub fn new(playback: P, lyrics: L, session: LyricsSession, redraw: RedrawSignal, config: &UserConfig) -> Self {
        let transform: Box<dyn TextTransform> = if config.trim_lyrics {
            Box::new(Trimmed)
        } else {
            Box::new(Identity)
        };

        Self {
            playback,
            lyrics,
            session,
            redraw,
            transform,
            tolerance_secs: config.duration_tolerance_secs,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            last_track: None,
        }
    }

    /// Replaces the per-line text post-processor.
    pub fn with_transform(mut self, transform: Box<dyn TextTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub async fn poll_once(&mut self) -> PollOutcome {
        let state = match self.playback.current_playback().await {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::debug!("nothing playing");
                return PollOutcome::Idle;
            }
            Err(e) => {
                tracing::warn!(error = %e, "playback fetch failed");
                return PollOutcome::Idle;
            }
        };

        let identity = state.identity();
        let track_changed = self.last_track.as_deref() != Some(identity.as_str());
        if track_changed {
            tracing::info!(track = %identity, "track changed");
            let document = self.load_document(&state).await;
            self.session.set_document(document);
            self.last_track = Some(identity);
            self.redraw.notify();
        }

        let line_changed = self.session.advance(state.progress_ms);
        if line_changed {
            self.redraw.notify();
        }

        PollOutcome::Updated {
            track_changed,
            line_changed,
        }
    }

    async fn load_document(&self, state: &PlaybackState) -> LyricDocument {
        let query = state.query();
        let found = match self.lyrics.search(&query).await {
            Ok(candidates) => select_within(&candidates, &query, self.tolerance_secs),
            Err(e) => Err(e),
        };

        match found {
            Ok(document) => {
                tracing::info!(lines = document.len(), mode = ?document.mode, "lyrics loaded");
                document.map_text(self.transform.as_ref())
            }
            Err(e) => {
                tracing::warn!(error = %e, "no lyrics, showing nothing");
                LyricDocument::empty()
            }
        }
    }

    /// Polls until `stop` flips to true or its sender is dropped. A poll in
    /// flight is abandoned as soon as the stop signal fires.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        tracing::info!("poller started");
        while !*stop.borrow() {
            let outcome = tokio::select! {
                outcome = self.poll_once() => outcome,
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            };

            let delay = match outcome {
                PollOutcome::Idle => self.retry_delay,
                PollOutcome::Updated { .. } => self.poll_interval,
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("poller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::redraw_channel;
    use crate::lyrics::{Candidate, LyricMode, LyricsError, TrackQuery};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedPlayback(VecDeque<anyhow::Result<Option<PlaybackState>>>);

    impl PlaybackSource for ScriptedPlayback {
        async fn current_playback(&mut self) -> anyhow::Result<Option<PlaybackState>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    #[derive(Clone, Default)]
    struct FakeLyrics {
        candidates: Vec<Candidate>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl LyricsSource for FakeLyrics {
        async fn search(&self, _query: &TrackQuery) -> Result<Vec<Candidate>, LyricsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LyricsError::Status(503));
            }
            Ok(self.candidates.clone())
        }
    }

    fn playing(track: &str, progress_ms: u64) -> anyhow::Result<Option<PlaybackState>> {
        Ok(Some(PlaybackState {
            track: track.into(),
            artist: "Band".into(),
            album: "Album".into(),
            duration_sec: 200,
            progress_ms,
        }))
    }

    fn synced_candidate(track: &str) -> Candidate {
        Candidate {
            track_name: track.into(),
            artist_name: "Band".into(),
            duration: 200.0,
            synced_lyrics: Some("[00:01.00] first \n[00:05.00]second\n[00:09.00]third".into()),
            ..Default::default()
        }
    }

    fn poller(
        script: Vec<anyhow::Result<Option<PlaybackState>>>,
        lyrics: FakeLyrics,
    ) -> (Poller<ScriptedPlayback, FakeLyrics>, LyricsSession, tokio::sync::mpsc::Receiver<()>) {
        let session = LyricsSession::new();
        let (signal, rx) = redraw_channel();
        let p = Poller::new(
            ScriptedPlayback(script.into()),
            lyrics,
            session.clone(),
            signal,
            &UserConfig::default(),
        );
        (p, session, rx)
    }

    #[tokio::test]
    async fn test_track_change_loads_and_advances() {
        let lyrics = FakeLyrics {
            candidates: vec![synced_candidate("Song")],
            ..Default::default()
        };
        let (mut p, session, mut rx) = poller(vec![playing("Song", 5500)], lyrics.clone());

        let outcome = p.poll_once().await;
        assert_eq!(
            outcome,
            PollOutcome::Updated {
                track_changed: true,
                line_changed: true
            }
        );

        let snap = session.snapshot();
        assert_eq!(snap.document.mode, LyricMode::Synced);
        assert_eq!(snap.document.len(), 3);
        assert_eq!(snap.active, Some(1));
        // Two notifications, one pending redraw
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
        assert_eq!(lyrics.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_same_track_no_refetch_no_redundant_redraw() {
        let lyrics = FakeLyrics {
            candidates: vec![synced_candidate("Song")],
            ..Default::default()
        };
        let (mut p, session, mut rx) = poller(
            vec![playing("Song", 1200), playing("Song", 1800), playing("Song", 9100)],
            lyrics.clone(),
        );

        p.poll_once().await;
        let _ = rx.try_recv();

        let outcome = p.poll_once().await;
        assert_eq!(
            outcome,
            PollOutcome::Updated {
                track_changed: false,
                line_changed: false
            }
        );
        assert!(rx.try_recv().is_err());

        p.poll_once().await;
        assert!(rx.try_recv().is_ok());
        assert_eq!(session.snapshot().active, Some(2));
        assert_eq!(lyrics.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_changes_nothing() {
        let lyrics = FakeLyrics {
            candidates: vec![synced_candidate("Song")],
            ..Default::default()
        };
        let (mut p, session, mut rx) = poller(
            vec![
                playing("Song", 5500),
                Err(anyhow::anyhow!("connection reset")),
                Ok(None),
            ],
            lyrics,
        );

        p.poll_once().await;
        let _ = rx.try_recv();

        assert_eq!(p.poll_once().await, PollOutcome::Idle);
        assert_eq!(p.poll_once().await, PollOutcome::Idle);

        let snap = session.snapshot();
        assert_eq!(snap.document.len(), 3);
        assert_eq!(snap.active, Some(1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lyrics_failure_gives_empty_document() {
        let lyrics = FakeLyrics {
            fail: true,
            ..Default::default()
        };
        let (mut p, session, mut rx) = poller(vec![playing("Song", 5500)], lyrics);

        p.poll_once().await;

        let snap = session.snapshot();
        assert!(snap.document.is_empty());
        assert_eq!(snap.active, None);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_track_change_resets_index() {
        let lyrics = FakeLyrics {
            candidates: vec![synced_candidate("Song"), synced_candidate("Other")],
            ..Default::default()
        };
        let (mut p, session, _rx) = poller(vec![playing("Song", 9500), playing("Other", 0)], lyrics);

        p.poll_once().await;
        assert_eq!(session.snapshot().active, Some(2));

        let outcome = p.poll_once().await;
        assert_eq!(
            outcome,
            PollOutcome::Updated {
                track_changed: true,
                line_changed: false
            }
        );
        assert_eq!(session.snapshot().active, None);
    }

    #[tokio::test]
    async fn test_transform_applied_per_line() {
        let lyrics = FakeLyrics {
            candidates: vec![synced_candidate("Song")],
            ..Default::default()
        };
        let (p, session, _rx) = poller(vec![playing("Song", 0)], lyrics);
        let mut p = p.with_transform(Box::new(Trimmed));

        p.poll_once().await;
        let snap = session.snapshot();
        assert_eq!(snap.document.lines[0].text, "first");
        assert_eq!(snap.document.len(), 3);
    }

    struct StalledPlayback;

    impl PlaybackSource for StalledPlayback {
        async fn current_playback(&mut self) -> anyhow::Result<Option<PlaybackState>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_run_stops_mid_request() {
        let (signal, _rx) = redraw_channel();
        let p = Poller::new(
            StalledPlayback,
            FakeLyrics::default(),
            LyricsSession::new(),
            signal,
            &UserConfig::default(),
        );
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(p.run(stop_rx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller stuck on a pending request")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_stops_when_sender_dropped() {
        let (signal, _rx) = redraw_channel();
        let p = Poller::new(
            StalledPlayback,
            FakeLyrics::default(),
            LyricsSession::new(),
            signal,
            &UserConfig::default(),
        );
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(p.run(stop_rx));
        drop(stop_tx);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller ignored a dropped stop sender")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_stops_on_signal() {
        let (p, _session, _rx) = poller(Vec::new(), FakeLyrics::default());
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(p.run(stop_rx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
    }
}
