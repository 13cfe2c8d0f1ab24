//! TUI module for the SARI client
//!
//! Terminal user interface using Ratatui.

mod app;
mod params;
mod pickers;
mod ui;

pub use app::run;
