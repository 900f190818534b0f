use std::fs;
use std::path::PathBuf;

pub mod credentials;
pub mod setup;
pub mod user;

pub use credentials::Credentials;
pub use user::UserConfig;

/// Locates and loads everything under the config directory.
#[derive(Debug, Clone)]
pub struct AppConfig {
    dir: PathBuf,
}

impl AppConfig {
    pub fn new(dir: PathBuf) -> Self {
        // Ensure it exists
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        Self { dir }
    }

    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sptly")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.dir.join("credentials.toml")
    }

    pub fn theme_path(&self) -> PathBuf {
        self.dir.join("theme.toml")
    }

    /// Reads `config.toml`, creating it with defaults when missing.
    pub fn load_user(&self) -> UserConfig {
        let config_path = self.config_path();

        if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "invalid config.toml, using defaults");
                    UserConfig::default()
                }),
                Err(_) => UserConfig::default(),
            }
        } else {
            let c = UserConfig::default();
            if let Ok(content) = toml::to_string_pretty(&c) {
                let _ = fs::write(&config_path, content);
            }
            c
        }
    }

    pub fn load_credentials(&self) -> anyhow::Result<Credentials> {
        Credentials::load(&self.credentials_path())
    }
}
