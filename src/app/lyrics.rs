use crate::lyrics::{Candidate, LyricsError, TrackQuery};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

const MAX_RETRIES: u8 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Produces lyric candidates for a track, best match first.
pub trait LyricsSource: Send + Sync {
    fn search(&self, query: &TrackQuery) -> impl Future<Output = Result<Vec<Candidate>, LyricsError>> + Send;
}

/// Talks to an lrclib-compatible `/api/search` endpoint.
pub struct LrclibClient {
    client: Client,
    search_url: String,
}

impl LrclibClient {
    pub fn new(client: Client, search_url: impl Into<String>) -> Self {
        Self {
            client,
            search_url: search_url.into(),
        }
    }
}

impl LyricsSource for LrclibClient {
    async fn search(&self, query: &TrackQuery) -> Result<Vec<Candidate>, LyricsError> {
        let params = [
            ("track_name", query.track.as_str()),
            ("artist_name", query.artist.as_str()),
            ("album_name", query.album.as_str()),
        ];

        // Retry 🔄
        let mut attempt = 0;
        let resp = loop {
            match self
                .client
                .get(&self.search_url)
                .query(&params)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
            {
                Ok(response) => break response,
                Err(e) => {
                    attempt += 1;
                    if attempt > MAX_RETRIES {
                        return Err(LyricsError::Network(e));
                    }
                    tracing::debug!(attempt, error = %e, "lyrics search failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        };

        if !resp.status().is_success() {
            return Err(LyricsError::Status(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        Ok(parse_candidates(&body))
    }
}

/// Search results in response order. A body that is not a JSON array of
/// records reads as "no results"; a malformed record is skipped on its own.
pub fn parse_candidates(body: &str) -> Vec<Candidate> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(body) {
        Ok(records) => records,
        Err(e) => {
            tracing::debug!(error = %e, "unparsable lyrics search body");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| {
            serde_json::from_value(record)
                .map_err(|e| tracing::debug!(error = %e, "skipping malformed search record"))
                .ok()
        })
        .collect()
}
