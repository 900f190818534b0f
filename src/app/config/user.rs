use serde::{Deserialize, Serialize};

/// User-editable configuration (ReadOnly by App after load)
/// stored in `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Delay between playback polls.
    pub poll_interval_ms: u64,
    /// Delay after a failed or empty poll.
    pub retry_delay_ms: u64,
    pub token_refresh_secs: u64,
    /// How far a synced candidate's duration may drift from the track's.
    pub duration_tolerance_secs: u64,
    /// lrclib-compatible `/api/search` endpoint.
    pub lyrics_search_url: String,
    pub user_agent: String,
    /// Upper bound on any single HTTP request.
    pub request_timeout_secs: u64,
    pub trim_lyrics: bool,
    pub show_border: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            retry_delay_ms: 500,
            token_refresh_secs: 600,
            duration_tolerance_secs: 2,
            lyrics_search_url: "https://lrclib.net/api/search".to_string(),
            user_agent: concat!("sptly/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 10,
            trim_lyrics: false,
            show_border: false,
        }
    }
}
