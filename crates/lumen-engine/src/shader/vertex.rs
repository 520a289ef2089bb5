use anyhow::Result;

use super::source::{EntryPointInfo, ShaderSource};
use crate::renderable::SimpleVertex;

/// Vertex buffer layout a vertex shader consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub array_stride: wgpu::BufferAddress,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

impl Default for VertexLayout {
    /// Layout of [`SimpleVertex`].
    fn default() -> Self {
        Self {
            array_stride: SimpleVertex::STRIDE,
            attributes: SimpleVertex::ATTRIBS.to_vec(),
        }
    }
}

/// Vertex stage: WGSL source, entry point and input layout.
#[derive(Debug)]
pub struct VertexShader {
    source: ShaderSource,
    entry_point: String,
    layout: VertexLayout,
    module: Option<wgpu::ShaderModule>,
    info: EntryPointInfo,
}

impl VertexShader {
    pub fn new(source: impl Into<ShaderSource>, entry_point: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entry_point: entry_point.into(),
            layout: VertexLayout::default(),
            module: None,
            info: EntryPointInfo::default(),
        }
    }

    pub fn with_layout(mut self, layout: VertexLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Validates the source, checks the entry point and compiles it.
    ///
    /// Invalid WGSL or a missing entry point is an error; the shader stays
    /// uninitialized.
    pub fn initialize(&mut self, device: &wgpu::Device) -> Result<()> {
        let label = format!("lumen vertex shader ({})", self.entry_point);
        let (module, info) =
            self.source
                .compile(device, &label, &self.entry_point, naga::ShaderStage::Vertex)?;
        self.module = Some(module);
        self.info = info;
        Ok(())
    }

    /// Checks the source without a device.
    pub fn validate(&self) -> Result<EntryPointInfo> {
        self.source.validate(&self.entry_point, naga::ShaderStage::Vertex)
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

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_simple_vertex() {
        let vs = VertexShader::new("", "vs_main");
        let layout = vs.layout().buffer_layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[2].offset, 20);
        assert!(!vs.is_initialized());
    }

    #[test]
    fn invalid_source_fails_validation() {
        let vs = VertexShader::new("fn broken(", "vs_main");
        let err = vs.validate().unwrap_err();
        assert!(format!("{err:#}").contains("invalid WGSL"), "{err:#}");
        assert!(!vs.is_initialized());
    }
}
