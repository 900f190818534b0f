use super::viewport::RowStyle;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Lyric colours (Catppuccin Mocha by default).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Lines already sung.
    pub before: Color,
    /// The active line.
    pub current: Color,
    /// Upcoming lines, and the centred line before playback reaches a cue.
    pub after: Color,
    #[serde(default = "default_bold")]
    pub bold_current: bool,
}

fn default_bold() -> bool {
    true
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            before: Color::Rgb(88, 91, 112),
            current: Color::Rgb(137, 180, 250),
            after: Color::Rgb(205, 214, 244),
            bold_current: true,
        }
    }
}

impl Theme {
    pub fn style_for(&self, style: RowStyle) -> Style {
        match style {
            RowStyle::Before => Style::default().fg(self.before),
            RowStyle::ActiveEmphasized => {
                let s = Style::default().fg(self.current);
                if self.bold_current {
                    s.add_modifier(Modifier::BOLD)
                } else {
                    s
                }
            }
            RowStyle::ActivePlain | RowStyle::After => Style::default().fg(self.after),
        }
    }
}

// Helper for serialization/deserialization
#[derive(Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Loads `theme.toml`, writing the default theme there first if it is missing.
pub fn load_theme(path: &Path) -> Theme {
    if path.exists() {
        if let Ok(content) = fs::read_to_string(path) {
            // Nested [theme] table first, then a flat file
            if let Ok(wrapper) = toml::from_str::<ThemeFile>(&content) {
                return wrapper.theme;
            }
            if let Ok(theme) = toml::from_str::<Theme>(&content) {
                return theme;
            }
            tracing::warn!(path = %path.display(), "unreadable theme, using default");
        }
        return Theme::default();
    }

    let default_theme = Theme::default();
    let wrapper = ThemeFile {
        theme: default_theme.clone(),
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(toml_str) = toml::to_string_pretty(&wrapper) {
        let _ = fs::write(path, toml_str);
    }
    default_theme
}
