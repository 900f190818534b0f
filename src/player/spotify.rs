//! Spotify Web API: currently-playing polling and OAuth token exchange.

use super::traits::{PlaybackSource, PlaybackState};
use crate::app::config::Credentials;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const CURRENTLY_PLAYING_URL: &str = "https://api.spotify.com/v1/me/player/currently-playing";
pub const SCOPES: &str = "user-read-playback-state user-read-currently-playing";

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("spotify network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("spotify returned HTTP {0}")]
    Status(u16),
    #[error("spotify returned no access token")]
    MissingToken,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlaying {
    #[serde(default)]
    progress_ms: Option<u64>,
    item: Option<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    name: String,
    #[serde(default)]
    duration_ms: u64,
    album: Option<Album>,
    #[serde(default)]
    artists: Vec<Artist>,
}

#[derive(Debug, Deserialize)]
struct Album {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Artist {
    #[serde(default)]
    name: String,
}

/// Maps a currently-playing body to a [`PlaybackState`]. Only the first
/// artist is kept. Episodes, ads and empty bodies yield `None`.
pub fn parse_currently_playing(body: &str) -> Option<PlaybackState> {
    let data: CurrentlyPlaying = serde_json::from_str(body).ok()?;
    let item = data.item?;
    let artist = item.artists.into_iter().next()?.name;
    if item.name.is_empty() {
        return None;
    }

    Some(PlaybackState {
        track: item.name,
        artist,
        album: item.album.map(|a| a.name).unwrap_or_default(),
        duration_sec: item.duration_ms / 1000,
        progress_ms: data.progress_ms.unwrap_or(0),
    })
}

pub struct SpotifyClient {
    client: Client,
    credentials: Credentials,
    refresh_every: Duration,
    // None forces a refresh before the next request
    refreshed_at: Option<Instant>,
}

impl SpotifyClient {
    /// The stored access token is trusted until `refresh_every` elapses or
    /// Spotify rejects it.
    pub fn new(client: Client, credentials: Credentials, refresh_every: Duration) -> Self {
        let refreshed_at = (!credentials.access_token.is_empty()).then(Instant::now);
        Self {
            client,
            credentials,
            refresh_every,
            refreshed_at,
        }
    }

    fn needs_refresh(&self) -> bool {
        match self.refreshed_at {
            Some(at) => at.elapsed() >= self.refresh_every,
            None => true,
        }
    }

    async fn refresh(&mut self) -> Result<(), SpotifyError> {
        let tokens = request_token(
            &self.client,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ],
        )
        .await?;

        self.credentials.access_token = tokens.access_token;
        // Spotify may rotate the refresh token
        if let Some(refresh) = tokens.refresh_token.filter(|r| !r.is_empty()) {
            self.credentials.refresh_token = refresh;
        }
        self.refreshed_at = Some(Instant::now());
        tracing::info!("spotify access token refreshed");
        Ok(())
    }

    pub async fn currently_playing(&mut self) -> Result<Option<PlaybackState>, SpotifyError> {
        if self.needs_refresh() {
            self.refresh().await?;
        }

        let resp = self
            .client
            .get(CURRENTLY_PLAYING_URL)
            .bearer_auth(&self.credentials.access_token)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => {
                let body = resp.text().await?;
                Ok(parse_currently_playing(&body))
            }
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("spotify rejected the access token, refreshing next poll");
                self.refreshed_at = None;
                Ok(None)
            }
            status => {
                // 204 is "nothing playing"
                tracing::debug!(status = status.as_u16(), "no playback reported");
                Ok(None)
            }
        }
    }
}

impl PlaybackSource for SpotifyClient {
    async fn current_playback(&mut self) -> anyhow::Result<Option<PlaybackState>> {
        Ok(self.currently_playing().await?)
    }
}

/// Trades an authorization code for the first token pair.
pub async fn exchange_code(
    client: &Client,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<TokenResponse, SpotifyError> {
    request_token(
        client,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ],
    )
    .await
}

async fn request_token(client: &Client, form: &[(&str, &str)]) -> Result<TokenResponse, SpotifyError> {
    let resp = client.post(TOKEN_URL).form(form).send().await?;
    if !resp.status().is_success() {
        return Err(SpotifyError::Status(resp.status().as_u16()));
    }

    let tokens: TokenResponse = resp.json().await?;
    if tokens.access_token.is_empty() {
        return Err(SpotifyError::MissingToken);
    }
    Ok(tokens)
}
