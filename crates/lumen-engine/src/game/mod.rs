//! Game loop driver.
//!
//! Owns the `winit` EventLoop and the window, and drives the renderer:
//! input → update → render once per redraw tick.

mod config;
mod runtime;

pub use config::GameConfig;
pub use runtime::Game;
