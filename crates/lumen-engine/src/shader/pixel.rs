use anyhow::Result;

use super::source::{EntryPointInfo, ShaderSource};

/// Fragment stage: WGSL source and entry point.
#[derive(Debug)]
pub struct PixelShader {
    source: ShaderSource,
    entry_point: String,
    module: Option<wgpu::ShaderModule>,
    info: EntryPointInfo,
}

impl PixelShader {
    pub fn new(source: impl Into<ShaderSource>, entry_point: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entry_point: entry_point.into(),
            module: None,
            info: EntryPointInfo::default(),
        }
    }

    /// Validates the source, checks the entry point and compiles it.
    ///
    /// Invalid WGSL or a missing entry point is an error; the shader stays
    /// uninitialized.
    pub fn initialize(&mut self, device: &wgpu::Device) -> Result<()> {
        let label = format!("lumen pixel shader ({})", self.entry_point);
        let (module, info) =
            self.source
                .compile(device, &label, &self.entry_point, naga::ShaderStage::Fragment)?;
        self.module = Some(module);
        self.info = info;
        Ok(())
    }

    /// Checks the source without a device.
    pub fn validate(&self) -> Result<EntryPointInfo> {
        self.source.validate(&self.entry_point, naga::ShaderStage::Fragment)
    }

    /// Drops the compiled module.
    pub(crate) fn release(&mut self) {
        self.module = None;
        self.info = EntryPointInfo::default();
    }

    /// Bind groups the entry point reads; empty until initialized.
    pub fn info(&self) -> &EntryPointInfo {
        &self.info
    }

    pub fn is_initialized(&self) -> bool {
        self.module.is_some()
    }

    pub fn module(&self) -> Option<&wgpu::ShaderModule> {
        self.module.as_ref()
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}
