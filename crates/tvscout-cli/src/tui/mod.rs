//! TUI module for the interactive discover form.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod form;
/// Discover form state types.
pub mod state;
mod ui;

pub use form::run_discover_form;
