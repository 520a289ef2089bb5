use super::init::RendererInit;

/// How the surface is configured; chosen once when the renderer initializes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SwapChainPath {
    /// Fully capable adapter: preferred format, two frames in flight.
    PerWindow,
    /// Downlevel adapter: first reported format, one frame in flight.
    Legacy,
}

impl SwapChainPath {
    pub fn select(downlevel: &wgpu::DownlevelCapabilities) -> Self {
        if downlevel.is_webgpu_compliant() {
            Self::PerWindow
        } else {
            Self::Legacy
        }
    }

    pub fn frame_latency(self) -> u32 {
        match self {
            Self::PerWindow => 2,
            Self::Legacy => 1,
        }
    }

    /// Surface configuration for a `width` x `height` client area.
    ///
    /// Returns `None` when the surface reports no formats.
    pub fn surface_config(
        self,
        caps: &wgpu::SurfaceCapabilities,
        width: u32,
        height: u32,
        init: &RendererInit,
    ) -> Option<wgpu::SurfaceConfiguration> {
        let format = match self {
            Self::PerWindow => choose_surface_format(caps, init.prefer_srgb)?,
            Self::Legacy => *caps.formats.first()?,
        };

        Some(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: init.present_mode,
            alpha_mode: choose_alpha_mode(caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: self.frame_latency(),
        })
    }
}

/// First format whose sRGB-ness matches the preference, else the first format.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    caps.formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    #[test]
    fn compliant_adapter_uses_per_window_path() {
        let full = wgpu::DownlevelCapabilities::default();
        assert_eq!(SwapChainPath::select(&full), SwapChainPath::PerWindow);

        let limited = wgpu::DownlevelCapabilities {
            flags: wgpu::DownlevelFlags::empty(),
            ..Default::default()
        };
        assert_eq!(SwapChainPath::select(&limited), SwapChainPath::Legacy);
    }

    #[test]
    fn per_window_path_honours_srgb_preference() {
        let c = caps(vec![
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Bgra8Unorm,
        ]);
        let init = RendererInit::default();

        let cfg = SwapChainPath::PerWindow
            .surface_config(&c, 800, 600, &init)
            .unwrap();
        assert_eq!(cfg.format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(cfg.desired_maximum_frame_latency, 2);

        let cfg = SwapChainPath::Legacy
            .surface_config(&c, 800, 600, &init)
            .unwrap();
        assert_eq!(cfg.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(cfg.desired_maximum_frame_latency, 1);
        assert_eq!((cfg.width, cfg.height), (800, 600));
    }

    #[test]
    fn no_formats_means_no_config() {
        let init = RendererInit::default();
        assert!(
            SwapChainPath::PerWindow
                .surface_config(&caps(vec![]), 1, 1, &init)
                .is_none()
        );
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let c = caps(vec![wgpu::TextureFormat::Rgba8Unorm]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }
}
