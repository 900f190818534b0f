pub mod cli;
pub mod config;
pub mod events;
pub mod input_handler;
pub mod lyrics;
pub mod poller;
pub mod state;

pub use state::*;
