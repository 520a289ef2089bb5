use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

/// Window the renderer can present into.
///
/// The renderer keeps the window alive through an `Arc` for as long as the
/// surface exists.
pub trait RenderWindow: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static {
    /// Client area in physical pixels.
    fn client_size(&self) -> (u32, u32);
}

impl RenderWindow for winit::window::Window {
    fn client_size(&self) -> (u32, u32) {
        let size = self.inner_size();
        (size.width, size.height)
    }
}
