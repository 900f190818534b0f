pub mod app;
pub mod lyrics;
pub mod player;
pub mod ui;
