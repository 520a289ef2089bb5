use super::driver::{DriverType, FeatureLevel};

/// Initialization parameters for the renderer's GPU layer.
#[derive(Debug, Clone)]
pub struct RendererInit {
    /// Adapter kinds to try, most preferred first.
    pub driver_types: Vec<DriverType>,

    /// Limit tiers to request, most capable first.
    pub feature_levels: Vec<FeatureLevel>,

    /// Backends the instance may use.
    pub backends: wgpu::Backends,

    /// Prefer an sRGB surface format when the per-window path picks one.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// The default presents immediately without waiting for vblank where the
    /// platform allows it.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Background color the color target is cleared to every frame.
    pub clear_color: wgpu::Color,
}

impl Default for RendererInit {
    fn default() -> Self {
        Self {
            driver_types: DriverType::PREFERENCE.to_vec(),
            feature_levels: FeatureLevel::PREFERENCE.to_vec(),
            backends: wgpu::Backends::all(),
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.125,
                b: 0.6,
                a: 1.0,
            },
        }
    }
}
