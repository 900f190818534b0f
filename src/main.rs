use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing_appender::non_blocking::WorkerGuard;

use sptly::app::cli::Args;
use sptly::app::config::{setup, AppConfig, UserConfig};
use sptly::app::events::redraw_channel;
use sptly::app::input_handler::handle_key;
use sptly::app::lyrics::LrclibClient;
use sptly::app::poller::Poller;
use sptly::app::App;
use sptly::lyrics::LyricsSession;
use sptly::player::SpotifyClient;
use sptly::ui::{self, theme::load_theme};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Restore terminal state - called on panic or normal exit
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Logs go to a file; stdout belongs to the TUI.
fn init_logging(level: &str) -> Option<WorkerGuard> {
    let log_dir = dirs::cache_dir()?.join("sptly");
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(&log_dir, "sptly.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let report_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        report_hook(panic_info);
    }));

    let args = Args::parse();

    if args.generate_config {
        println!("{}", toml::to_string_pretty(&UserConfig::default())?);
        return Ok(());
    }

    let _log_guard = init_logging(&args.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let config = AppConfig::new(args.config_dir.clone().unwrap_or_else(AppConfig::default_dir));
    let user = config.load_user();
    let theme = load_theme(&config.theme_path());

    // Shared HTTP client (reused by both providers)
    let client = reqwest::Client::builder()
        .user_agent(user.user_agent.as_str())
        .timeout(Duration::from_secs(user.request_timeout_secs))
        .build()
        .context("building http client")?;

    let credentials = match config.load_credentials() {
        Ok(c) if c.is_complete() && !args.setup => c,
        Ok(_) => setup::run(&config, &client).await?,
        Err(e) => {
            tracing::info!(error = %e, "no stored credentials");
            setup::run(&config, &client).await?
        }
    };

    let session = LyricsSession::new();
    let (redraw, redraw_rx) = redraw_channel();
    let (stop_tx, stop_rx) = watch::channel(false);

    let playback = SpotifyClient::new(
        client.clone(),
        credentials,
        Duration::from_secs(user.token_refresh_secs),
    );
    let lyrics = LrclibClient::new(client, user.lyrics_search_url.clone());
    let poller = Poller::new(playback, lyrics, session.clone(), redraw, &user);
    let poller_task = tokio::spawn(poller.run(stop_rx));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(theme, session, user.show_border);
    let result = run_display(&mut terminal, &mut app, redraw_rx).await;

    let _ = stop_tx.send(true);
    match tokio::time::timeout(SHUTDOWN_GRACE, poller_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "poller task ended abnormally"),
        Err(_) => tracing::warn!("poller did not stop in time, leaving it behind"),
    }

    restore_terminal();
    terminal.show_cursor()?;
    tracing::info!("bye");
    result
}

/// Draws once up front, then again on every redraw request or terminal event.
async fn run_display(terminal: &mut Tui, app: &mut App, mut redraw_rx: mpsc::Receiver<()>) -> Result<()> {
    let mut reader = EventStream::new();

    while app.is_running {
        terminal.draw(|f| ui::ui(f, app))?;

        tokio::select! {
            signal = redraw_rx.recv() => {
                if signal.is_none() {
                    tracing::warn!("poller went away");
                    break;
                }
            }
            event = reader.next() => match event {
                Some(Ok(Event::Key(key))) => handle_key(key, app),
                // Resize just needs the redraw at the top of the loop
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}
