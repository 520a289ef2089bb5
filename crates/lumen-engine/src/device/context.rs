use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;

use super::depth::DepthTarget;
use super::driver::{self, DriverType, FeatureLevel};
use super::error::SurfaceErrorAction;
use super::frame::GpuFrame;
use super::init::RendererInit;
use super::swap_chain::SwapChainPath;
use super::window::RenderWindow;

/// Owns wgpu core objects, the surface configuration and the depth target.
///
/// The driver type, feature level and swap-chain path are fixed at creation.
pub struct Gpu {
    /// Kept alive for the surface.
    _instance: wgpu::Instance,

    /// Surface bound to the window; owns a reference to it.
    surface: wgpu::Surface<'static>,

    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: (u32, u32),

    driver_type: DriverType,
    feature_level: FeatureLevel,
    swap_chain_path: SwapChainPath,

    depth: DepthTarget,
}

impl Gpu {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new<W: RenderWindow>(window: Arc<W>, init: &RendererInit) -> Result<Self> {
        let (width, height) = window.client_size();
        anyhow::ensure!(width > 0 && height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let driver::AcquiredDevice {
            adapter,
            device,
            queue,
            driver_type,
            feature_level,
        } = driver::acquire_device(&instance, &surface, init).await?;

        let swap_chain_path = SwapChainPath::select(&adapter.get_downlevel_capabilities());

        let surface_caps = surface.get_capabilities(&adapter);
        let config = swap_chain_path
            .surface_config(&surface_caps, width, height, init)
            .context("no supported surface formats")?;

        surface.configure(&device, &config);

        let depth = DepthTarget::new(&device, width, height);

        let info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), driver {driver_type:?}, feature level {feature_level:?}, \
             swap chain {swap_chain_path:?}, format {:?}",
            info.name,
            info.backend,
            config.format
        );

        Ok(Self {
            _instance: instance,
            surface,
            adapter,
            device,
            queue,
            config,
            size: (width, height),
            driver_type,
            feature_level,
            swap_chain_path,
            depth,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn driver_type(&self) -> DriverType {
        self.driver_type
    }

    pub fn feature_level(&self) -> FeatureLevel {
        self.feature_level
    }

    pub fn swap_chain_path(&self) -> SwapChainPath {
        self.swap_chain_path
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.depth.view()
    }

    /// Reconfigures the surface and rebuilds the depth target.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that
    /// case nothing changes and `false` is returned.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }

        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthTarget::new(&self.device, width, height);
        true
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// the surface when it was lost or outdated.
    pub fn handle_surface_error(&mut self, err: &SurfaceError) -> SurfaceErrorAction {
        let action = SurfaceErrorAction::classify(err);
        if action == SurfaceErrorAction::Reconfigured {
            let (width, height) = self.size;
            if width > 0 && height > 0 {
                self.surface.configure(&self.device, &self.config);
            }
        }
        action
    }
}
