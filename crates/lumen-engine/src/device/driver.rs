use anyhow::Result;

use super::init::RendererInit;

/// Kind of adapter requested, in the order the renderer tries them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DriverType {
    /// Discrete or integrated GPU.
    Hardware,
    /// Software rasterizer exposed as a fallback adapter.
    Warp,
    /// Whatever the platform offers under the low-power preference.
    Reference,
}

impl DriverType {
    pub const PREFERENCE: [Self; 3] = [Self::Hardware, Self::Warp, Self::Reference];

    pub fn power_preference(self) -> wgpu::PowerPreference {
        match self {
            Self::Hardware | Self::Warp => wgpu::PowerPreference::HighPerformance,
            Self::Reference => wgpu::PowerPreference::LowPower,
        }
    }

    pub fn forces_fallback_adapter(self) -> bool {
        matches!(self, Self::Warp)
    }
}

/// Tier of device limits, in descending order of capability.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FeatureLevel {
    Core,
    Downlevel,
    WebGl2,
}

impl FeatureLevel {
    pub const PREFERENCE: [Self; 3] = [Self::Core, Self::Downlevel, Self::WebGl2];

    pub fn limits(self) -> wgpu::Limits {
        match self {
            Self::Core => wgpu::Limits::default(),
            Self::Downlevel => wgpu::Limits::downlevel_defaults(),
            Self::WebGl2 => wgpu::Limits::downlevel_webgl2_defaults(),
        }
    }

    /// True when an adapter with `adapter_limits` can grant this tier.
    pub fn supported_by(self, adapter_limits: &wgpu::Limits) -> bool {
        self.limits().check_limits(adapter_limits)
    }
}

pub(crate) struct AcquiredDevice {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub driver_type: DriverType,
    pub feature_level: FeatureLevel,
}

/// Walks driver types, then feature levels, and returns the first device the
/// platform grants.
pub(crate) async fn acquire_device(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    init: &RendererInit,
) -> Result<AcquiredDevice> {
    for &driver_type in &init.driver_types {
        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: driver_type.power_preference(),
                compatible_surface: Some(surface),
                force_fallback_adapter: driver_type.forces_fallback_adapter(),
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(err) => {
                log::debug!("no {driver_type:?} adapter: {err}");
                continue;
            }
        };

        let adapter_limits = adapter.limits();

        for &feature_level in &init.feature_levels {
            if !feature_level.supported_by(&adapter_limits) {
                log::debug!("{driver_type:?} adapter cannot provide {feature_level:?} limits");
                continue;
            }

            let request = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("lumen-engine device"),
                    required_features: init.required_features,
                    required_limits: feature_level.limits(),
                    experimental_features: wgpu::ExperimentalFeatures::disabled(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    trace: wgpu::Trace::Off,
                })
                .await;

            match request {
                Ok((device, queue)) => {
                    return Ok(AcquiredDevice {
                        adapter,
                        device,
                        queue,
                        driver_type,
                        feature_level,
                    });
                }
                Err(err) => {
                    log::warn!("{driver_type:?}/{feature_level:?} device rejected: {err}");
                }
            }
        }
    }

    anyhow::bail!("no driver type and feature level combination produced a device")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warp_is_the_only_forced_fallback() {
        let forced: Vec<_> = DriverType::PREFERENCE
            .into_iter()
            .filter(|d| d.forces_fallback_adapter())
            .collect();
        assert_eq!(forced, vec![DriverType::Warp]);
    }

    #[test]
    fn lower_tiers_fit_within_higher_ones() {
        let core = wgpu::Limits::default();
        assert!(FeatureLevel::Core.supported_by(&core));
        assert!(FeatureLevel::Downlevel.supported_by(&core));
        assert!(FeatureLevel::WebGl2.supported_by(&core));

        let webgl2 = wgpu::Limits::downlevel_webgl2_defaults();
        assert!(!FeatureLevel::Core.supported_by(&webgl2));
        assert!(FeatureLevel::WebGl2.supported_by(&webgl2));
    }
}
