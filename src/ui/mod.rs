pub mod components;
pub mod theme;
pub mod utils;
pub mod viewport;

pub use theme::Theme;

use crate::app::App;
use ratatui::Frame;

pub fn ui(f: &mut Frame, app: &App) {
    components::lyrics::render(f, f.area(), app);
}
