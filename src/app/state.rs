use crate::lyrics::LyricsSession;
use crate::ui::theme::Theme;

/// Display-side state. Lyrics are only read here; the poller owns writes.
pub struct App {
    pub is_running: bool,
    pub theme: Theme,
    pub session: LyricsSession,
    pub show_border: bool,
}

impl App {
    pub fn new(theme: Theme, session: LyricsSession, show_border: bool) -> Self {
        Self {
            is_running: true,
            theme,
            session,
            show_border,
        }
    }
}
