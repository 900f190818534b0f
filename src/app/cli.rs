use clap::Parser;
use std::path::PathBuf;

/// sptly - Spotify lyrics, synced and centred in your terminal 🎵
#[derive(Parser, Debug)]
#[command(name = "sptly", version, about)]
pub struct Args {
    /// Run the Spotify authorization flow even if credentials exist
    #[arg(long)]
    pub setup: bool,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,

    /// Configuration directory (default: <config dir>/sptly)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
