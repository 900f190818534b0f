//! First-run authorization: walks the user through creating a Spotify app,
//! catches the OAuth redirect on a local socket and stores the tokens.

use super::{AppConfig, Credentials};
use crate::player::spotify::{self, AUTHORIZE_URL, SCOPES};
use anyhow::{bail, Context, Result};
use reqwest::{Client, Url};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::net::TcpListener;

const DASHBOARD_URL: &str = "https://developer.spotify.com/dashboard";

const DONE_PAGE: &str = "<html><body><p>Authorization complete. You can close this window.</p>\
<script>window.close();</script></body></html>";

/// What a request to the redirect URI carried.
#[derive(Debug, PartialEq, Eq)]
pub enum Callback {
    Code(String),
    Denied(String),
    Nothing,
}

pub async fn run(config: &AppConfig, client: &Client) -> Result<Credentials> {
    println!("Config not found. Opening Spotify Developer Dashboard in 5 seconds...");
    println!("Steps:");
    println!(" 1. Create a new app at {}", DASHBOARD_URL);
    println!(" 2. Copy Client ID, Client Secret, and set Redirect URI (example: http://127.0.0.1:8888/callback)");
    println!(" 3. Paste them here when prompted");

    tokio::time::sleep(Duration::from_secs(5)).await;
    open_browser(DASHBOARD_URL);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let client_id = prompt(&mut input, "Client ID: ").await?;
    let client_secret = prompt(&mut input, "Client Secret: ").await?;
    let redirect_uri = prompt(&mut input, "Redirect URI: ").await?;

    let (host, port) = callback_addr(&redirect_uri)?;
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("listening on {}:{}", host, port))?;

    let auth_url = authorize_url(&client_id, &redirect_uri)?;
    println!("Opening Spotify authorization page...");
    println!("If nothing opens, visit: {}", auth_url);
    open_browser(auth_url.as_str());

    let code = wait_for_code(&listener).await?;
    let tokens = spotify::exchange_code(client, &client_id, &client_secret, &redirect_uri, &code)
        .await
        .context("exchanging authorization code")?;

    let credentials = Credentials {
        client_id,
        client_secret,
        redirect_uri,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token.unwrap_or_default(),
    };
    if !credentials.is_complete() {
        bail!("spotify did not return a refresh token");
    }

    let path = config.credentials_path();
    credentials.save(&path)?;
    println!("Config saved to {}", path.display());
    tracing::info!(path = %path.display(), "credentials stored");
    Ok(credentials)
}

pub fn authorize_url(client_id: &str, redirect_uri: &str) -> Result<Url> {
    Ok(Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", SCOPES),
            ("show_dialog", "true"),
        ],
    )?)
}

/// Host and port the redirect URI points at.
pub fn callback_addr(redirect_uri: &str) -> Result<(String, u16)> {
    let url = Url::parse(redirect_uri).with_context(|| format!("invalid redirect URI {:?}", redirect_uri))?;
    let host = url.host_str().context("redirect URI has no host")?.to_string();
    let port = url.port_or_known_default().context("redirect URI has no port")?;
    Ok((host, port))
}

/// Reads the OAuth result out of an HTTP request line (`GET /path?query HTTP/1.1`).
pub fn parse_callback(request_line: &str) -> Callback {
    let mut parts = request_line.split_whitespace();
    let (Some("GET"), Some(target)) = (parts.next(), parts.next()) else {
        return Callback::Nothing;
    };
    let Ok(url) = Url::parse("http://localhost").and_then(|base| base.join(target)) else {
        return Callback::Nothing;
    };

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => return Callback::Code(value.into_owned()),
            "error" => return Callback::Denied(value.into_owned()),
            _ => {}
        }
    }
    Callback::Nothing
}

async fn wait_for_code(listener: &TcpListener) -> Result<String> {
    loop {
        let (mut stream, _) = listener.accept().await?;
        let mut buf = vec![0u8; 4096];
        let n = stream.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);
        let request_line = request.lines().next().unwrap_or_default();

        match parse_callback(request_line) {
            Callback::Code(code) => {
                respond(&mut stream, "text/html", DONE_PAGE).await;
                return Ok(code);
            }
            Callback::Denied(reason) => {
                respond(&mut stream, "text/plain", "Authorization denied").await;
                bail!("authorization denied: {}", reason);
            }
            Callback::Nothing => respond(&mut stream, "text/plain", "No code received").await,
        }
    }
}

async fn respond(stream: &mut tokio::net::TcpStream, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn prompt(input: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    match input.next_line().await? {
        Some(line) => Ok(line.trim().to_string()),
        None => bail!("stdin closed during setup"),
    }
}

fn open_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let cmd = std::process::Command::new("open").arg(url).spawn();
    #[cfg(target_os = "windows")]
    let cmd = std::process::Command::new("rundll32")
        .arg("url.dll,FileProtocolHandler")
        .arg(url)
        .spawn();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let cmd = std::process::Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = cmd {
        tracing::debug!(error = %e, "could not launch browser");
        println!("Open this URL manually: {}", url);
    }
}
