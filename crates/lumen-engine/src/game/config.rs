use winit::dpi::LogicalSize;

/// Window configuration for [`Game`](super::Game).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Close the game when Escape is pressed.
    pub exit_on_escape: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            exit_on_escape: true,
        }
    }
}
