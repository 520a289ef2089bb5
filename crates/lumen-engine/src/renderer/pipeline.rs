use std::collections::HashMap;

use anyhow::{Context, Result};

use super::constants::MATERIAL_GROUP;
use super::ctx::BindLayouts;
use super::registry::Name;
use crate::device::DEPTH_FORMAT;
use crate::shader::{EntryPointInfo, PixelShader, VertexShader};

/// A shader pair plus whether the material group is bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PipelineKey {
    pub vertex: Name,
    pub pixel: Name,
    pub textured: bool,
}

/// Checks that the shaders only read bind groups the pipeline layout for
/// `textured` provides.
pub(crate) fn check_bindings(
    textured: bool,
    vertex: &EntryPointInfo,
    pixel: &EntryPointInfo,
) -> Result<(), String> {
    let available = if textured { MATERIAL_GROUP } else { MATERIAL_GROUP - 1 };
    for (stage, info) in [("vertex", vertex), ("pixel", pixel)] {
        if let Some(group) = info.groups().find(|&g| g > available) {
            return Err(if group == MATERIAL_GROUP {
                format!("{stage} shader samples a texture but the renderable has none")
            } else {
                format!("{stage} shader reads bind group {group}, which the renderer never binds")
            });
        }
    }
    Ok(())
}

/// Render pipelines built lazily, one per distinct [`PipelineKey`].
pub(crate) struct PipelineCache {
    format: wgpu::TextureFormat,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    /// Keys the device refused, with its message; not retried.
    failed: HashMap<PipelineKey, String>,
}

impl PipelineCache {
    pub fn new(format: wgpu::TextureFormat) -> Self {
        Self {
            format,
            pipelines: HashMap::new(),
            failed: HashMap::new(),
        }
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    /// Builds the pipeline for `key` unless it exists.
    ///
    /// Creation runs inside a validation error scope; a rejected pipeline is
    /// remembered and reported again on later calls without another attempt.
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        layouts: &BindLayouts,
        key: &PipelineKey,
        vs: &VertexShader,
        ps: &PixelShader,
    ) -> Result<()> {
        if self.pipelines.contains_key(key) {
            return Ok(());
        }
        if let Some(err) = self.failed.get(key) {
            anyhow::bail!("{err}");
        }
        let vs_module = vs.module().context("vertex shader is not initialized")?;
        let ps_module = ps.module().context("pixel shader is not initialized")?;

        let layout = if key.textured {
            &layouts.textured_pipeline
        } else {
            &layouts.untextured_pipeline
        };

        let label = format!("lumen pipeline {}+{}", key.vertex, key.pixel);
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label.as_str()),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: vs_module,
                entry_point: Some(vs.entry_point()),
                compilation_options: Default::default(),
                buffers: &[vs.layout().buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: ps_module,
                entry_point: Some(ps.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Clockwise front faces with back-face culling, the classic
            // left-handed rasterizer default.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            let message = format!("{label} rejected by the device: {err}");
            self.failed.insert(key.clone(), message.clone());
            anyhow::bail!(message);
        }

        log::debug!("created {label} (textured: {})", key.textured);
        self.pipelines.insert(key.clone(), pipeline);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderSource;

    fn info(code: &str, entry: &str, stage: naga::ShaderStage) -> EntryPointInfo {
        ShaderSource::Wgsl(code.to_string().into())
            .validate(entry, stage)
            .unwrap()
    }

    const SHADERS: &str = r#"
@group(1) @binding(2) var<uniform> color: vec4<f32>;
@group(2) @binding(0) var diffuse: texture_2d<f32>;
@group(2) @binding(1) var diffuse_sampler: sampler;
@group(3) @binding(0) var<uniform> extra: vec4<f32>;

@vertex
fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 1.0);
}

@fragment
fn fs_solid() -> @location(0) vec4<f32> {
    return color;
}

@fragment
fn fs_textured() -> @location(0) vec4<f32> {
    return textureSample(diffuse, diffuse_sampler, vec2<f32>(0.0, 0.0));
}

@fragment
fn fs_extra() -> @location(0) vec4<f32> {
    return extra;
}
"#;

    #[test]
    fn textured_pixel_shader_needs_a_textured_renderable() {
        let vs = info(SHADERS, "vs_main", naga::ShaderStage::Vertex);
        let ps = info(SHADERS, "fs_textured", naga::ShaderStage::Fragment);

        let err = check_bindings(false, &vs, &ps).unwrap_err();
        assert!(err.contains("samples a texture"), "{err}");
        assert_eq!(check_bindings(true, &vs, &ps), Ok(()));
    }

    #[test]
    fn untextured_shaders_fit_either_layout() {
        let vs = info(SHADERS, "vs_main", naga::ShaderStage::Vertex);
        let ps = info(SHADERS, "fs_solid", naga::ShaderStage::Fragment);
        assert_eq!(check_bindings(false, &vs, &ps), Ok(()));
        assert_eq!(check_bindings(true, &vs, &ps), Ok(()));
    }

    #[test]
    fn unknown_groups_are_rejected() {
        let vs = info(SHADERS, "vs_main", naga::ShaderStage::Vertex);
        let ps = info(SHADERS, "fs_extra", naga::ShaderStage::Fragment);
        let err = check_bindings(true, &vs, &ps).unwrap_err();
        assert!(err.contains("group 3"), "{err}");
    }
}
